use aloha_client::{AssignmentService, PermissionCatalog};
use aloha_error::{ServiceError, SyncError};
use aloha_types::Permission;
use futures::future::join_all;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Calls needed to move the assigned set to the selected one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
}

impl SyncPlan {
    pub fn between(current: &BTreeSet<String>, selected: &BTreeSet<String>) -> Self {
        SyncPlan {
            to_add: selected.difference(current).cloned().collect(),
            to_remove: current.difference(selected).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Checkbox style editor for the permissions of one group or user
pub struct AssociationSync<A: AssignmentService, C: PermissionCatalog> {
    assignments: A,
    catalog: C,
    parent_id: String,
    permissions: Vec<Permission>,
    current: BTreeSet<String>,
    selected: BTreeSet<String>,
    error: Option<String>,
}

impl<A: AssignmentService, C: PermissionCatalog> AssociationSync<A, C> {
    pub fn new(assignments: A, catalog: C, parent_id: &str) -> Self {
        Self {
            assignments,
            catalog,
            parent_id: parent_id.to_string(),
            permissions: Vec::new(),
            current: BTreeSet::new(),
            selected: BTreeSet::new(),
            error: None,
        }
    }

    pub fn parent_id(&self) -> &str {
        &self.parent_id
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub fn current(&self) -> &BTreeSet<String> {
        &self.current
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Loads the catalog and the assigned ids side by side. The selection
    /// starts out equal to what is assigned.
    pub async fn load(&mut self) -> Result<(), SyncError> {
        let (catalog, assigned) = futures::join!(
            self.catalog.catalog(),
            self.assignments.assigned(&self.parent_id)
        );

        let (catalog, assigned) = match (catalog, assigned) {
            (Ok(catalog), Ok(assigned)) => (catalog, assigned),
            (Err(e), _) | (_, Err(e)) => {
                self.error = Some(e.to_string());
                return Err(SyncError::Load(e));
            }
        };

        self.permissions = catalog;
        self.current = assigned.into_iter().collect();
        self.selected = self.current.clone();
        self.error = None;
        Ok(())
    }

    pub fn toggle(&mut self, permission_id: &str) {
        if !self.selected.remove(permission_id) {
            self.selected.insert(permission_id.to_string());
        }
    }

    pub fn set_selected<I, T>(&mut self, permission_ids: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.selected = permission_ids.into_iter().map(Into::into).collect();
    }

    pub fn is_selected(&self, permission_id: &str) -> bool {
        self.selected.contains(permission_id)
    }

    /// Plan against the last loaded state
    pub fn diff(&self) -> SyncPlan {
        SyncPlan::between(&self.current, &self.selected)
    }

    /// Re-reads the assigned ids, then issues every add and remove at once.
    /// All calls run to completion; failures are reported per id and
    /// successful calls are kept.
    pub async fn save(&mut self) -> Result<SyncPlan, SyncError> {
        let fresh: BTreeSet<String> = match self.assignments.assigned(&self.parent_id).await {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(SyncError::Load(e));
            }
        };

        let plan = SyncPlan::between(&fresh, &self.selected);

        let parent_id = self.parent_id.as_str();
        let assignments = &self.assignments;
        let adds = join_all(
            plan.to_add
                .iter()
                .map(|id| assignments.assign(parent_id, id)),
        );
        let removes = join_all(
            plan.to_remove
                .iter()
                .map(|id| assignments.unassign(parent_id, id)),
        );
        let (added, removed) = futures::join!(adds, removes);

        let failed_adds = failures(&plan.to_add, added);
        let failed_removes = failures(&plan.to_remove, removed);

        // what the backend holds now, as far as we know
        let mut current = fresh;
        for id in plan.to_add.iter().filter(|id| !failed_adds.contains(id)) {
            current.insert(id.clone());
        }
        for id in plan.to_remove.iter().filter(|id| !failed_removes.contains(id)) {
            current.remove(id);
        }
        self.current = current;

        if failed_adds.is_empty() && failed_removes.is_empty() {
            info!(
                "Updated permissions of {}: {} added, {} removed",
                self.parent_id,
                plan.to_add.len(),
                plan.to_remove.len()
            );
            self.error = None;
            return Ok(plan);
        }

        let succeeded =
            plan.to_add.len() + plan.to_remove.len() - failed_adds.len() - failed_removes.len();
        let err = SyncError::Partial {
            failed_adds,
            failed_removes,
            succeeded,
        };
        warn!("{} for {}", err, self.parent_id);
        self.error = Some(err.to_string());
        Err(err)
    }
}

fn failures(ids: &[String], results: Vec<Result<(), ServiceError>>) -> Vec<String> {
    ids.iter()
        .zip(results)
        .filter_map(|(id, result)| match result {
            Ok(()) => None,
            Err(e) => {
                warn!("Permission {} failed: {}", id, e);
                Some(id.clone())
            }
        })
        .collect()
}
