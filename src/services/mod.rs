pub mod categories;
pub mod classes;
pub mod competences;
pub mod forms;

pub use categories::CategoryService;
pub use classes::ClassService;
pub use competences::CompetenceService;
pub use forms::FormService;
