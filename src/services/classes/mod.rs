pub mod code;
pub mod create;
pub mod delete;
pub mod join;
pub mod list;
pub mod pending;
pub mod students;

use std::sync::Arc;

use crate::errors::{AppError, Result};
use crate::models::auth::entities::Identity;
use crate::models::classes::{
    entities::Class,
    requests::{AddPendingStudentRequest, AddStudentsRequest, CreateClassRequest, JoinClassRequest},
    responses::{AddStudentsResponse, ClassCodeResponse},
};
use crate::models::students::entities::{PendingStudent, Student, StudentName, StudentSummary};
use crate::storage::Storage;
use crate::utils::CodeGenerator;

pub struct ClassService {
    storage: Arc<dyn Storage>,
    codes: CodeGenerator,
}

impl ClassService {
    pub fn new(storage: Arc<dyn Storage>, codes: CodeGenerator) -> Self {
        Self { storage, codes }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub(crate) fn codes(&self) -> &CodeGenerator {
        &self.codes
    }

    /// 加载班级并要求调用者是班级所有者
    pub(crate) async fn owned_class(&self, class_id: i64, identity: &Identity) -> Result<Class> {
        let class = self.existing_class(class_id).await?;
        if !class.is_owned_by(identity.id) {
            return Err(AppError::authorization(
                "You do not have permission to manage this class",
            ));
        }
        Ok(class)
    }

    pub(crate) async fn existing_class(&self, class_id: i64) -> Result<Class> {
        self.storage
            .get_class_by_id(class_id)
            .await?
            .ok_or_else(|| AppError::not_found("Class not found"))
    }

    pub(crate) async fn class_by_code(&self, code: &str) -> Result<Class> {
        self.storage
            .get_class_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Invalid class code"))
    }

    // 创建班级
    pub async fn create_class(&self, identity: &Identity, req: CreateClassRequest) -> Result<Class> {
        create::create_class(self, identity, req).await
    }

    // 为班级重新生成加入码
    pub async fn regenerate_code(
        &self,
        class_id: i64,
        identity: &Identity,
    ) -> Result<ClassCodeResponse> {
        code::regenerate_code(self, class_id, identity).await
    }

    // 删除班级
    pub async fn delete_class(&self, class_id: i64, identity: &Identity) -> Result<()> {
        delete::delete_class(self, class_id, identity).await
    }

    // 列出调用者可见的班级
    pub async fn list_classes_for_identity(&self, identity: &Identity) -> Result<Vec<Class>> {
        list::list_classes_for_identity(self, identity).await
    }

    // 批量添加学生
    pub async fn add_students(
        &self,
        class_id: i64,
        identity: &Identity,
        req: AddStudentsRequest,
    ) -> Result<AddStudentsResponse> {
        students::add_students(self, class_id, identity, req).await
    }

    // 通过加入码认领学生
    pub async fn join_class(&self, identity: &Identity, req: JoinClassRequest) -> Result<Class> {
        join::join_class(self, identity, req).await
    }

    // 班级名册
    pub async fn list_students(&self, class_id: i64) -> Result<Vec<Student>> {
        students::list_students(self, class_id).await
    }

    // 通过加入码列出未认领学生
    pub async fn list_students_by_code(&self, code: &str) -> Result<Vec<StudentName>> {
        students::list_students_by_code(self, code).await
    }

    // 按姓氏前缀搜索学生
    pub async fn search_students(
        &self,
        code: &str,
        last_name_prefix: &str,
    ) -> Result<Vec<StudentSummary>> {
        students::search_students(self, code, last_name_prefix).await
    }

    // 添加待注册学生
    pub async fn add_pending_student(
        &self,
        class_id: i64,
        identity: &Identity,
        req: AddPendingStudentRequest,
    ) -> Result<PendingStudent> {
        pending::add_pending_student(self, class_id, identity, req).await
    }

    // 列出待注册学生
    pub async fn list_pending_students(&self, class_id: i64) -> Result<Vec<PendingStudent>> {
        pending::list_pending_students(self, class_id).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::ClassService;
    use crate::errors::{AppError, Result};
    use crate::models::auth::entities::{Identity, UserRole};
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
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::memory_storage;
    use crate::utils::{CodeGenerator, CodeStrategy};

    pub const TEACHER_A: i64 = 1;
    pub const TEACHER_B: i64 = 2;

    pub async fn service() -> ClassService {
        ClassService::new(memory_storage().await, CodeGenerator::new(CodeStrategy::Hex, 16))
    }

    pub fn teacher(id: i64) -> Identity {
        Identity::new(id, UserRole::Teacher)
    }

    pub fn student(id: i64) -> Identity {
        Identity::new(id, UserRole::Student)
    }

    /// 前 N 次写入加入码时返回唯一约束冲突，其余调用转发给内存存储
    pub struct CollidingStorage {
        inner: Arc<dyn Storage>,
        collisions_left: AtomicU32,
        code_writes: AtomicU32,
    }

    impl CollidingStorage {
        pub async fn new(collisions: u32) -> Arc<Self> {
            Arc::new(Self {
                inner: memory_storage().await,
                collisions_left: AtomicU32::new(collisions),
                code_writes: AtomicU32::new(0),
            })
        }

        pub fn inject_collisions(&self, collisions: u32) {
            self.collisions_left.store(collisions, Ordering::SeqCst);
        }

        /// 已尝试的加入码写入次数（含冲突）
        pub fn code_writes(&self) -> u32 {
            self.code_writes.load(Ordering::SeqCst)
        }

        fn collide(&self) -> Result<()> {
            self.code_writes.fetch_add(1, Ordering::SeqCst);
            let remaining = self
                .collisions_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
            match remaining {
                Ok(_) => Err(AppError::conflict("UNIQUE constraint failed: classes.code")),
                Err(_) => Ok(()),
            }
        }
    }

    pub fn service_with(storage: Arc<CollidingStorage>, max_attempts: u32) -> ClassService {
        ClassService::new(storage, CodeGenerator::new(CodeStrategy::Hex, max_attempts))
    }

    #[async_trait]
    impl Storage for CollidingStorage {
        async fn create_class(&self, class: NewClass) -> Result<Class> {
            self.collide()?;
            self.inner.create_class(class).await
        }

        async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
            self.inner.get_class_by_id(class_id).await
        }

        async fn get_class_by_code(&self, code: &str) -> Result<Option<Class>> {
            self.inner.get_class_by_code(code).await
        }

        async fn class_code_exists(&self, code: &str) -> Result<bool> {
            self.inner.class_code_exists(code).await
        }

        async fn list_classes_by_teacher(&self, teacher_id: i64) -> Result<Vec<Class>> {
            self.inner.list_classes_by_teacher(teacher_id).await
        }

        async fn list_classes_by_ids(&self, class_ids: &[i64]) -> Result<Vec<Class>> {
            self.inner.list_classes_by_ids(class_ids).await
        }

        async fn update_class_code(&self, class_id: i64, code: &str) -> Result<Option<Class>> {
            self.collide()?;
            self.inner.update_class_code(class_id, code).await
        }

        async fn delete_class(&self, class_id: i64) -> Result<bool> {
            self.inner.delete_class(class_id).await
        }

        async fn create_students(
            &self,
            class_id: i64,
            entries: Vec<StudentEntry>,
        ) -> Result<Vec<Student>> {
            self.inner.create_students(class_id, entries).await
        }

        async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>> {
            self.inner.list_students_by_class(class_id).await
        }

        async fn list_students_by_user(&self, user_id: i64) -> Result<Vec<Student>> {
            self.inner.list_students_by_user(user_id).await
        }

        async fn find_students_by_name(
            &self,
            class_id: i64,
            first_name: &str,
            last_name: &str,
        ) -> Result<Vec<Student>> {
            self.inner
                .find_students_by_name(class_id, first_name, last_name)
                .await
        }

        async fn claim_student(&self, student_id: i64, user_id: i64) -> Result<bool> {
            self.inner.claim_student(student_id, user_id).await
        }

        async fn add_pending_student(
            &self,
            class_id: i64,
            name: &str,
            email: &str,
        ) -> Result<PendingStudent> {
            self.inner.add_pending_student(class_id, name, email).await
        }

        async fn list_pending_students(&self, class_id: i64) -> Result<Vec<PendingStudent>> {
            self.inner.list_pending_students(class_id).await
        }

        async fn create_category(
            &self,
            created_by: i64,
            category: CreateCategoryRequest,
        ) -> Result<Category> {
            self.inner.create_category(created_by, category).await
        }

        async fn get_category_by_id(&self, category_id: i64) -> Result<Option<Category>> {
            self.inner.get_category_by_id(category_id).await
        }

        async fn list_categories(&self) -> Result<Vec<Category>> {
            self.inner.list_categories().await
        }

        async fn update_category(
            &self,
            category_id: i64,
            update: UpdateCategoryRequest,
        ) -> Result<Option<Category>> {
            self.inner.update_category(category_id, update).await
        }

        async fn delete_category(&self, category_id: i64) -> Result<bool> {
            self.inner.delete_category(category_id).await
        }

        async fn create_competence(
            &self,
            created_by: i64,
            competence: CreateCompetenceRequest,
        ) -> Result<Competence> {
            self.inner.create_competence(created_by, competence).await
        }

        async fn get_competence_by_id(
            &self,
            competence_id: i64,
        ) -> Result<Option<CompetenceWithCategory>> {
            self.inner.get_competence_by_id(competence_id).await
        }

        async fn list_competences(&self) -> Result<Vec<CompetenceWithCategory>> {
            self.inner.list_competences().await
        }

        async fn list_competences_by_category(&self, category_id: i64) -> Result<Vec<Competence>> {
            self.inner.list_competences_by_category(category_id).await
        }

        async fn list_competences_by_ids(&self, competence_ids: &[i64]) -> Result<Vec<Competence>> {
            self.inner.list_competences_by_ids(competence_ids).await
        }

        async fn update_competence(
            &self,
            competence_id: i64,
            update: UpdateCompetenceRequest,
        ) -> Result<Option<Competence>> {
            self.inner.update_competence(competence_id, update).await
        }

        async fn delete_competence(&self, competence_id: i64) -> Result<bool> {
            self.inner.delete_competence(competence_id).await
        }

        async fn create_form(&self, created_by: i64, form: CreateFormRequest) -> Result<Form> {
            self.inner.create_form(created_by, form).await
        }

        async fn get_form_by_id(&self, form_id: i64) -> Result<Option<Form>> {
            self.inner.get_form_by_id(form_id).await
        }

        async fn list_forms_by_creator(&self, created_by: i64) -> Result<Vec<Form>> {
            self.inner.list_forms_by_creator(created_by).await
        }

        async fn update_form(&self, form_id: i64, update: UpdateFormRequest) -> Result<Option<Form>> {
            self.inner.update_form(form_id, update).await
        }

        async fn delete_form(&self, form_id: i64) -> Result<bool> {
            self.inner.delete_form(form_id).await
        }
    }
}
