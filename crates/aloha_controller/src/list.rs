use crate::confirm::Confirm;
use aloha_client::{CreateService, ListService, UpdateService};
use aloha_error::{ControllerError, ServiceError};
use aloha_types::{ListQuery, Page, Pagination, Record, Validate};
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Create,
    Edit,
}

/// Issued by `begin_fetch`; only the most recent ticket may update state
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    generation: u64,
    query: ListQuery,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Failed,
    /// A newer fetch was started after this one
    Stale,
}

/// State behind one paginated list page. Every mutation is followed by a
/// refetch of the current page; nothing is updated optimistically.
pub struct ListController<S: ListService> {
    service: S,
    query: ListQuery,
    items: Vec<S::Record>,
    pagination: Pagination,
    is_loading: bool,
    error: Option<String>,
    selected_item: Option<S::Record>,
    modal: Option<ModalKind>,
    generation: u64,
}

impl<S: ListService> ListController<S> {
    pub fn new(service: S, page_size: u32) -> Self {
        Self::with_query(service, ListQuery::new(1, page_size))
    }

    /// Starts from a custom query, e.g. with sort or filters applied
    pub fn with_query(service: S, query: ListQuery) -> Self {
        let pagination = Pagination::new(query.page, query.size, 0);
        Self {
            service,
            query,
            items: Vec::new(),
            pagination,
            is_loading: false,
            error: None,
            selected_item: None,
            modal: None,
            generation: 0,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn items(&self) -> &[S::Record] {
        &self.items
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn page(&self) -> u32 {
        self.query.page
    }

    pub fn page_size(&self) -> u32 {
        self.query.size
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected_item(&self) -> Option<&S::Record> {
        self.selected_item.as_ref()
    }

    pub fn modal(&self) -> Option<ModalKind> {
        self.modal
    }

    pub fn total_pages(&self) -> u32 {
        self.pagination.total_pages()
    }

    /// No rows and nothing went wrong: show the empty state
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.error.is_none()
    }

    /// Initial load
    pub async fn mount(&mut self) -> Result<FetchOutcome, ControllerError> {
        self.refresh().await
    }

    /// Marks a fetch of the current query as in flight. Rows already shown
    /// stay in place until the result arrives.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.is_loading = true;
        self.error = None;

        FetchTicket {
            generation: self.generation,
            query: self.query.clone(),
        }
    }

    pub async fn run_fetch(&self, ticket: &FetchTicket) -> Result<Page<S::Record>, ServiceError> {
        self.service.list(&ticket.query).await
    }

    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Page<S::Record>, ServiceError>,
    ) -> Result<FetchOutcome, ControllerError> {
        if ticket.generation != self.generation {
            debug!(
                "Discarding stale {} fetch for page {}",
                <S::Record as Record>::PLURAL,
                ticket.query.page
            );
            return Ok(FetchOutcome::Stale);
        }

        self.is_loading = false;

        match result {
            Ok(page) => {
                let mut pagination = page.pagination;
                pagination.page = ticket.query.page;
                pagination.size = ticket.query.size;

                self.items = page.data;
                self.pagination = pagination;
                self.error = None;
                Ok(FetchOutcome::Applied)
            }
            Err(e) => {
                error!("Failed to fetch {}: {}", <S::Record as Record>::PLURAL, e);
                self.error = Some(e.to_string());
                Err(ControllerError::Service(e))
            }
        }
    }

    /// Fetches the current page and applies the result
    pub async fn refresh(&mut self) -> Result<FetchOutcome, ControllerError> {
        let ticket = self.begin_fetch();
        let result = self.run_fetch(&ticket).await;

        match self.apply_fetch(ticket, result) {
            Err(ControllerError::Service(_)) => Ok(FetchOutcome::Failed),
            other => other,
        }
    }

    /// Moves to page `page`. Out of range pages and the current page are
    /// ignored and return `false`.
    pub async fn change_page(&mut self, page: u32) -> Result<bool, ControllerError> {
        if page < 1 || page > self.total_pages() || page == self.query.page {
            return Ok(false);
        }

        self.query.page = page;
        self.refresh().await?;
        Ok(true)
    }

    pub async fn change_page_size(&mut self, size: u32) -> Result<(), ControllerError> {
        if size == 0 {
            return Err(ControllerError::Error(
                "Page size must be greater than zero".to_string(),
            ));
        }

        self.query.page = 1;
        self.query.size = size;
        self.refresh().await?;
        Ok(())
    }

    /// Deletes `item` once the operator confirms, then reloads the current
    /// page. The page is kept even if it ends up empty.
    pub async fn request_delete(
        &mut self,
        item: &S::Record,
        confirm: &dyn Confirm,
    ) -> Result<(), ControllerError> {
        let prompt = format!(
            "Are you sure you want to delete this {}?",
            <S::Record as Record>::NOUN
        );

        if !confirm.confirm(&prompt) {
            return Err(ControllerError::Cancelled);
        }

        if let Err(e) = self.service.delete(&item.key()).await {
            error!("Failed to delete {}: {}", <S::Record as Record>::NOUN, e);
            self.error = Some(e.to_string());
            return Err(ControllerError::Service(e));
        }

        self.refresh().await?;
        Ok(())
    }

    pub fn open_create(&mut self) {
        self.selected_item = None;
        self.modal = Some(ModalKind::Create);
    }

    pub fn open_edit(&mut self, item: S::Record) {
        self.selected_item = Some(item);
        self.modal = Some(ModalKind::Edit);
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.selected_item = None;
    }

    pub async fn on_modal_success(&mut self) -> Result<FetchOutcome, ControllerError> {
        self.close_modal();
        self.refresh().await
    }

    fn record_failure(&mut self, action: &str, e: ServiceError) -> ControllerError {
        error!(
            "Failed to {} {}: {}",
            action,
            <S::Record as Record>::NOUN,
            e
        );
        self.error = Some(e.to_string());
        ControllerError::Service(e)
    }
}

impl<S: CreateService> ListController<S> {
    /// Validates and submits the create form. The modal stays open on failure.
    pub async fn submit_create(&mut self, form: &S::Form) -> Result<(), ControllerError> {
        form.validate()?;

        if let Err(e) = self.service.create(form).await {
            return Err(self.record_failure("create", e));
        }

        self.on_modal_success().await?;
        Ok(())
    }
}

impl<S: UpdateService> ListController<S> {
    /// Validates and submits changes to the selected item
    pub async fn submit_edit(&mut self, changes: &S::Changes) -> Result<(), ControllerError> {
        let key = match &self.selected_item {
            Some(item) => item.key(),
            None => return Err(ControllerError::NoSelection),
        };

        changes.validate()?;

        if let Err(e) = self.service.update(&key, changes).await {
            return Err(self.record_failure("update", e));
        }

        self.on_modal_success().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::MockConfirm;
    use aloha_error::{ApiError, ValidationErrors};
    use aloha_types::{GroupPermission, GroupPermissionKey, Pagination, UserGroup};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct GroupForm {
        group_name: String,
    }

    impl Validate for GroupForm {
        fn validate(&self) -> Result<(), ValidationErrors> {
            let mut errors = ValidationErrors::new();
            if self.group_name.trim().is_empty() {
                errors.add("group_name", "Group name is required");
            }
            errors.into_result()
        }
    }

    /// In-memory collection that records every call it receives
    #[derive(Default)]
    struct FakeGroups {
        rows: Mutex<Vec<UserGroup>>,
        lists: Mutex<Vec<ListQuery>>,
        deletes: Mutex<Vec<String>>,
        updates: Mutex<Vec<(String, String)>>,
        fail_list: Mutex<bool>,
        fail_writes: Mutex<bool>,
    }

    fn group(id: &str, name: &str) -> UserGroup {
        UserGroup {
            id: id.to_string(),
            group_name: name.to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    impl FakeGroups {
        fn with_rows(count: usize) -> Self {
            let fake = FakeGroups::default();
            *fake.rows.lock().unwrap() = (1..=count)
                .map(|i| group(&format!("g-{}", i), &format!("Group {}", i)))
                .collect();
            fake
        }

        fn list_count(&self) -> usize {
            self.lists.lock().unwrap().len()
        }

        fn last_list(&self) -> ListQuery {
            self.lists.lock().unwrap().last().cloned().unwrap()
        }

        fn failure() -> ServiceError {
            ServiceError::Api(ApiError::Status {
                status: 500,
                status_text: "Internal Server Error".to_string(),
            })
        }
    }

    #[async_trait]
    impl ListService for FakeGroups {
        type Record = UserGroup;

        async fn list(&self, query: &ListQuery) -> Result<Page<UserGroup>, ServiceError> {
            self.lists.lock().unwrap().push(query.clone());
            if *self.fail_list.lock().unwrap() {
                return Err(Self::failure());
            }

            let rows = self.rows.lock().unwrap();
            let start = ((query.page - 1) * query.size) as usize;
            let data: Vec<UserGroup> = rows
                .iter()
                .skip(start)
                .take(query.size as usize)
                .cloned()
                .collect();

            Ok(Page {
                data,
                pagination: Pagination::new(query.page, query.size, rows.len() as u64),
            })
        }

        async fn delete(&self, key: &String) -> Result<(), ServiceError> {
            self.deletes.lock().unwrap().push(key.clone());
            if *self.fail_writes.lock().unwrap() {
                return Err(Self::failure());
            }
            self.rows.lock().unwrap().retain(|g| &g.id != key);
            Ok(())
        }
    }

    #[async_trait]
    impl CreateService for FakeGroups {
        type Form = GroupForm;

        async fn create(&self, form: &GroupForm) -> Result<(), ServiceError> {
            if *self.fail_writes.lock().unwrap() {
                return Err(Self::failure());
            }
            let mut rows = self.rows.lock().unwrap();
            let id = format!("g-{}", rows.len() + 1);
            rows.push(group(&id, &form.group_name));
            Ok(())
        }
    }

    #[async_trait]
    impl UpdateService for FakeGroups {
        type Changes = GroupForm;

        async fn update(&self, key: &String, changes: &GroupForm) -> Result<(), ServiceError> {
            self.updates
                .lock()
                .unwrap()
                .push((key.clone(), changes.group_name.clone()));
            Ok(())
        }
    }

    async fn mounted(rows: usize, size: u32) -> ListController<FakeGroups> {
        let mut controller = ListController::new(FakeGroups::with_rows(rows), size);
        controller.mount().await.unwrap();
        controller
    }

    #[tokio::test]
    async fn test_mount_fetches_first_page_once() {
        let controller = mounted(12, 10).await;

        assert_eq!(controller.service().list_count(), 1);
        let query = controller.service().last_list();
        assert_eq!((query.page, query.size), (1, 10));
        assert_eq!(controller.items().len(), 10);
        assert_eq!(controller.total_pages(), 2);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_change_page() {
        let mut controller = mounted(12, 10).await;

        assert!(controller.change_page(2).await.unwrap());
        assert_eq!(controller.page(), 2);
        assert_eq!(controller.pagination().page, 2);
        assert_eq!(controller.items().len(), 2);
        assert_eq!(controller.service().last_list().page, 2);

        // out of range and same page are ignored
        assert!(!controller.change_page(0).await.unwrap());
        assert!(!controller.change_page(3).await.unwrap());
        assert!(!controller.change_page(2).await.unwrap());
        assert_eq!(controller.service().list_count(), 2);
    }

    #[tokio::test]
    async fn test_change_page_size_resets_page() {
        let mut controller = mounted(30, 10).await;
        controller.change_page(3).await.unwrap();
        let before = controller.service().list_count();

        controller.change_page_size(20).await.unwrap();

        assert_eq!(controller.service().list_count(), before + 1);
        let query = controller.service().last_list();
        assert_eq!((query.page, query.size), (1, 20));
        assert_eq!(controller.page(), 1);

        assert!(controller.change_page_size(0).await.is_err());
        assert_eq!(controller.service().list_count(), before + 1);
    }

    #[tokio::test]
    async fn test_declined_delete_makes_no_call() {
        let mut controller = mounted(3, 10).await;
        let target = controller.items()[0].clone();

        let mut confirm = MockConfirm::new();
        confirm
            .expect_confirm()
            .withf(|prompt| prompt == "Are you sure you want to delete this user group?")
            .times(1)
            .return_const(false);

        let result = controller.request_delete(&target, &confirm).await;

        assert!(matches!(result, Err(ControllerError::Cancelled)));
        assert!(controller.service().deletes.lock().unwrap().is_empty());
        assert_eq!(controller.service().list_count(), 1);
        assert_eq!(controller.error(), None);
    }

    #[tokio::test]
    async fn test_confirmed_delete_refetches_current_page() {
        let mut controller = mounted(12, 10).await;
        controller.change_page(2).await.unwrap();
        let target = controller.items()[0].clone();

        let mut confirm = MockConfirm::new();
        confirm.expect_confirm().times(1).return_const(true);

        controller.request_delete(&target, &confirm).await.unwrap();

        assert_eq!(*controller.service().deletes.lock().unwrap(), vec![target.id]);
        assert_eq!(controller.service().list_count(), 3);
        assert_eq!(controller.service().last_list().page, 2);
    }

    #[tokio::test]
    async fn test_deleting_last_row_stays_on_page() {
        let mut controller = mounted(11, 10).await;
        controller.change_page(2).await.unwrap();
        assert_eq!(controller.items().len(), 1);

        let target = controller.items()[0].clone();
        let mut confirm = MockConfirm::new();
        confirm.expect_confirm().return_const(true);

        controller.request_delete(&target, &confirm).await.unwrap();

        assert_eq!(controller.page(), 2);
        assert!(controller.items().is_empty());
        assert_eq!(controller.error(), None);
        assert!(controller.is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_rows() {
        let mut controller = mounted(5, 10).await;
        *controller.service().fail_list.lock().unwrap() = true;

        let outcome = controller.refresh().await.unwrap();

        assert_eq!(outcome, FetchOutcome::Failed);
        assert_eq!(controller.items().len(), 5);
        assert_eq!(
            controller.error(),
            Some("Request failed with status 500 Internal Server Error")
        );
        assert!(!controller.is_empty());
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_stale_fetch_is_discarded() {
        let mut controller = mounted(15, 10).await;

        let first = controller.begin_fetch();
        let stale = controller.run_fetch(&first).await;

        controller.query.page = 2;
        let second = controller.begin_fetch();
        let fresh = controller.run_fetch(&second).await;

        assert_eq!(
            controller.apply_fetch(second, fresh).unwrap(),
            FetchOutcome::Applied
        );
        assert_eq!(
            controller.apply_fetch(first, stale).unwrap(),
            FetchOutcome::Stale
        );

        assert_eq!(controller.pagination().page, 2);
        assert_eq!(controller.items().len(), 5);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_loading_while_in_flight() {
        let mut controller = mounted(2, 10).await;
        let ticket = controller.begin_fetch();

        assert!(controller.is_loading());
        assert_eq!(controller.items().len(), 2);

        let result = controller.run_fetch(&ticket).await;
        controller.apply_fetch(ticket, result).unwrap();
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_empty_list_is_not_an_error() {
        let controller = mounted(0, 10).await;

        assert!(controller.is_empty());
        assert_eq!(controller.error(), None);
        assert_eq!(controller.total_pages(), 1);
    }

    #[tokio::test]
    async fn test_submit_create_closes_modal_and_refetches() {
        let mut controller = mounted(0, 10).await;
        controller.open_create();
        assert_eq!(controller.modal(), Some(ModalKind::Create));

        controller
            .submit_create(&GroupForm {
                group_name: "QA Team".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(controller.modal(), None);
        assert_eq!(controller.selected_item(), None);
        assert_eq!(controller.service().list_count(), 2);
        assert_eq!(controller.items()[0].group_name, "QA Team");
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_submitted() {
        let mut controller = mounted(0, 10).await;
        controller.open_create();

        let err = controller
            .submit_create(&GroupForm {
                group_name: " ".to_string(),
            })
            .await
            .unwrap_err();

        match err {
            ControllerError::Validation(errors) => {
                assert_eq!(errors.get("group_name"), Some("Group name is required"))
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(controller.modal(), Some(ModalKind::Create));
        assert_eq!(controller.service().list_count(), 1);
        assert_eq!(controller.error(), None);
    }

    #[tokio::test]
    async fn test_failed_create_keeps_modal_open() {
        let mut controller = mounted(1, 10).await;
        *controller.service().fail_writes.lock().unwrap() = true;
        controller.open_create();

        let result = controller
            .submit_create(&GroupForm {
                group_name: "Ops".to_string(),
            })
            .await;

        assert!(result.is_err());
        assert_eq!(controller.modal(), Some(ModalKind::Create));
        assert!(controller.error().is_some());
        assert_eq!(controller.service().list_count(), 1);
    }

    #[tokio::test]
    async fn test_submit_edit() {
        let mut controller = mounted(3, 10).await;

        let changes = GroupForm {
            group_name: "Renamed".to_string(),
        };
        assert!(matches!(
            controller.submit_edit(&changes).await,
            Err(ControllerError::NoSelection)
        ));

        let target = controller.items()[1].clone();
        controller.open_edit(target.clone());
        assert_eq!(controller.selected_item(), Some(&target));

        controller.submit_edit(&changes).await.unwrap();

        assert_eq!(
            *controller.service().updates.lock().unwrap(),
            vec![(target.id, "Renamed".to_string())]
        );
        assert_eq!(controller.modal(), None);
        assert_eq!(controller.selected_item(), None);
        assert_eq!(controller.service().list_count(), 2);
    }

    #[tokio::test]
    async fn test_close_modal_does_not_refetch() {
        let mut controller = mounted(3, 10).await;
        let target = controller.items()[0].clone();
        controller.open_edit(target);

        controller.close_modal();

        assert_eq!(controller.modal(), None);
        assert_eq!(controller.selected_item(), None);
        assert_eq!(controller.service().list_count(), 1);
    }

    /// Group permission rows addressed by their `{group_id, permission_id}` pair
    #[derive(Default)]
    struct FakeGroupPermissions {
        rows: Mutex<Vec<GroupPermission>>,
        lists: Mutex<Vec<ListQuery>>,
        deletes: Mutex<Vec<GroupPermissionKey>>,
    }

    #[async_trait]
    impl ListService for FakeGroupPermissions {
        type Record = GroupPermission;

        async fn list(&self, query: &ListQuery) -> Result<Page<GroupPermission>, ServiceError> {
            self.lists.lock().unwrap().push(query.clone());

            let rows = self.rows.lock().unwrap();
            let start = ((query.page - 1) * query.size) as usize;
            Ok(Page {
                data: rows.iter().skip(start).take(query.size as usize).cloned().collect(),
                pagination: Pagination::new(query.page, query.size, rows.len() as u64),
            })
        }

        async fn delete(&self, key: &GroupPermissionKey) -> Result<(), ServiceError> {
            self.deletes.lock().unwrap().push(key.clone());
            self.rows.lock().unwrap().retain(|row| &row.key() != key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_delete_by_composite_key() {
        let fake = FakeGroupPermissions::default();
        *fake.rows.lock().unwrap() = ["p-1", "p-2", "p-3", "p-4"]
            .iter()
            .map(|permission_id| GroupPermission {
                group_id: "g-1".to_string(),
                permission_id: permission_id.to_string(),
                created_at: None,
            })
            .collect();

        let mut controller = ListController::new(fake, 2);
        controller.mount().await.unwrap();
        controller.change_page(2).await.unwrap();
        let target = controller.items()[0].clone();

        let mut confirm = MockConfirm::new();
        confirm
            .expect_confirm()
            .withf(|prompt| prompt == "Are you sure you want to delete this group permission?")
            .times(1)
            .return_const(true);

        controller.request_delete(&target, &confirm).await.unwrap();

        assert_eq!(
            *controller.service().deletes.lock().unwrap(),
            vec![GroupPermissionKey {
                group_id: "g-1".to_string(),
                permission_id: "p-3".to_string(),
            }]
        );

        let lists = controller.service().lists.lock().unwrap().clone();
        assert_eq!(lists.len(), 3);
        assert_eq!(lists[2].page, 2);

        let remaining: Vec<&str> = controller
            .items()
            .iter()
            .map(|row| row.permission_id.as_str())
            .collect();
        assert_eq!(remaining, vec!["p-4"]);
    }
}
