//! 预导入模块，方便使用

pub use super::categories::{
    ActiveModel as CategoryActiveModel, Entity as Categories, Model as CategoryModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::competences::{
    ActiveModel as CompetenceActiveModel, Entity as Competences, Model as CompetenceModel,
};
pub use super::form_competences::{
    ActiveModel as FormCompetenceActiveModel, Entity as FormCompetences,
    Model as FormCompetenceModel,
};
pub use super::forms::{ActiveModel as FormActiveModel, Entity as Forms, Model as FormModel};
pub use super::pending_students::{
    ActiveModel as PendingStudentActiveModel, Entity as PendingStudents,
    Model as PendingStudentModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
