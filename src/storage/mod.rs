use std::sync::Arc;

use crate::models::{
    categories::{
        entities::Category,
        requests::{CreateCategoryRequest, UpdateCategoryRequest},
    },
    classes::{entities::Class, requests::NewClass},
    competences::{
        entities::{Competence, CompetenceWithCategory},
        requests::{CreateCompetenceRequest, UpdateCompetenceRequest},
    },
    forms::{
        entities::Form,
        requests::{CreateFormRequest, UpdateFormRequest},
    },
    students::{
        entities::{PendingStudent, Student},
        requests::StudentEntry,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 班级管理方法
    // 创建班级，加入码冲突时返回 Conflict
    async fn create_class(&self, class: NewClass) -> Result<Class>;
    // 通过ID获取班级信息
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 通过加入码获取班级信息
    async fn get_class_by_code(&self, code: &str) -> Result<Option<Class>>;
    // 检查加入码是否已被占用
    async fn class_code_exists(&self, code: &str) -> Result<bool>;
    // 列出教师拥有的班级
    async fn list_classes_by_teacher(&self, teacher_id: i64) -> Result<Vec<Class>>;
    // 按ID批量获取班级
    async fn list_classes_by_ids(&self, class_ids: &[i64]) -> Result<Vec<Class>>;
    // 替换加入码，冲突时返回 Conflict
    async fn update_class_code(&self, class_id: i64, code: &str) -> Result<Option<Class>>;
    // 删除班级（级联删除名册与待注册学生）
    async fn delete_class(&self, class_id: i64) -> Result<bool>;

    /// 名册管理方法
    // 在一个事务中批量创建学生
    async fn create_students(
        &self,
        class_id: i64,
        entries: Vec<StudentEntry>,
    ) -> Result<Vec<Student>>;
    // 列出班级名册，按插入顺序
    async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>>;
    // 列出账号认领的所有学生
    async fn list_students_by_user(&self, user_id: i64) -> Result<Vec<Student>>;
    // 按姓名查找班级中的学生，按插入顺序
    async fn find_students_by_name(
        &self,
        class_id: i64,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<Student>>;
    // 仅当学生未被认领时写入 user_id，返回是否写入成功
    async fn claim_student(&self, student_id: i64, user_id: i64) -> Result<bool>;

    /// 待注册学生方法
    // 添加待注册学生
    async fn add_pending_student(
        &self,
        class_id: i64,
        name: &str,
        email: &str,
    ) -> Result<PendingStudent>;
    // 列出班级的待注册学生
    async fn list_pending_students(&self, class_id: i64) -> Result<Vec<PendingStudent>>;

    /// 能力分类方法
    async fn create_category(
        &self,
        created_by: i64,
        category: CreateCategoryRequest,
    ) -> Result<Category>;
    async fn get_category_by_id(&self, category_id: i64) -> Result<Option<Category>>;
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn update_category(
        &self,
        category_id: i64,
        update: UpdateCategoryRequest,
    ) -> Result<Option<Category>>;
    // 在事务中检查引用并删除，仍有能力项引用时返回 Conflict
    async fn delete_category(&self, category_id: i64) -> Result<bool>;

    /// 能力项方法
    async fn create_competence(
        &self,
        created_by: i64,
        competence: CreateCompetenceRequest,
    ) -> Result<Competence>;
    async fn get_competence_by_id(
        &self,
        competence_id: i64,
    ) -> Result<Option<CompetenceWithCategory>>;
    async fn list_competences(&self) -> Result<Vec<CompetenceWithCategory>>;
    async fn list_competences_by_category(&self, category_id: i64) -> Result<Vec<Competence>>;
    async fn list_competences_by_ids(&self, competence_ids: &[i64]) -> Result<Vec<Competence>>;
    async fn update_competence(
        &self,
        competence_id: i64,
        update: UpdateCompetenceRequest,
    ) -> Result<Option<Competence>>;
    async fn delete_competence(&self, competence_id: i64) -> Result<bool>;

    /// 评估表单方法
    async fn create_form(&self, created_by: i64, form: CreateFormRequest) -> Result<Form>;
    async fn get_form_by_id(&self, form_id: i64) -> Result<Option<Form>>;
    async fn list_forms_by_creator(&self, created_by: i64) -> Result<Vec<Form>>;
    async fn update_form(&self, form_id: i64, update: UpdateFormRequest) -> Result<Option<Form>>;
    async fn delete_form(&self, form_id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
