pub mod categories;

pub mod classes;

pub mod competences;

pub mod forms;

pub use categories::configure_categories_routes;
pub use classes::configure_classes_routes;
pub use competences::configure_competences_routes;
pub use forms::configure_forms_routes;
