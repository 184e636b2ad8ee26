//! Scripted in-memory backup service for operation-flow tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use cbr_core::client::{
    BackupParams, BackupService, OperationError, OperationStatus, ResourceStatus, RestoreParams,
    TransportError,
};
use cbr_core::poll::ResourceState;

/// Arguments of one recorded create call.
#[derive(Debug, Clone)]
pub struct CreateCall {
    pub plan: String,
    pub id: String,
    pub body: serde_json::Value,
}

#[derive(Default)]
struct StateScript {
    queue: RefCell<VecDeque<Result<ResourceState, TransportError>>>,
    hold: Cell<ResourceState>,
    polls: Cell<u64>,
}

impl StateScript {
    fn next(&self, name: &str) -> Result<ResourceStatus, TransportError> {
        self.polls.set(self.polls.get() + 1);
        let state = match self.queue.borrow_mut().pop_front() {
            Some(Ok(state)) => {
                self.hold.set(state);
                state
            }
            Some(Err(err)) => return Err(err),
            None => self.hold.get(),
        };
        Ok(ResourceStatus {
            name: name.to_string(),
            state,
            ..ResourceStatus::default()
        })
    }
}

/// In-memory [`BackupService`] replaying scripted answers.
///
/// Reads pop the next scripted outcome for their resource kind and hold at
/// the last returned state once the script runs dry. Create calls are
/// recorded and answered with a not-yet-done operation named `op_name`.
pub struct FakeService {
    backups: StateScript,
    restores: StateScript,
    operations: RefCell<VecDeque<OperationStatus>>,
    pub backup_creates: RefCell<Vec<CreateCall>>,
    pub restore_creates: RefCell<Vec<CreateCall>>,
    pub op_name: String,
    pub index_url: String,
}

impl FakeService {
    pub fn new() -> Self {
        Self {
            backups: StateScript::default(),
            restores: StateScript::default(),
            operations: RefCell::new(VecDeque::new()),
            backup_creates: RefCell::new(Vec::new()),
            restore_creates: RefCell::new(Vec::new()),
            op_name: "projects/p/locations/l/operations/op-1".to_string(),
            index_url: "https://signed.example/index".to_string(),
        }
    }

    pub fn push_backup_state(&self, state: ResourceState) {
        self.backups.queue.borrow_mut().push_back(Ok(state));
    }

    pub fn push_backup_error(&self, err: TransportError) {
        self.backups.queue.borrow_mut().push_back(Err(err));
    }

    pub fn push_restore_state(&self, state: ResourceState) {
        self.restores.queue.borrow_mut().push_back(Ok(state));
    }

    pub fn push_operation(&self, done: bool) {
        self.operations.borrow_mut().push_back(OperationStatus {
            name: self.op_name.clone(),
            done,
            error: None,
        });
    }

    pub fn push_operation_error(&self, code: i32, message: &str) {
        self.operations.borrow_mut().push_back(OperationStatus {
            name: self.op_name.clone(),
            done: true,
            error: Some(OperationError {
                code,
                message: message.to_string(),
            }),
        });
    }

    pub fn backup_polls(&self) -> u64 {
        self.backups.polls.get()
    }
}

impl BackupService for FakeService {
    fn get_backup(&self, name: &str) -> Result<ResourceStatus, TransportError> {
        self.backups.next(name)
    }

    fn get_restore(&self, name: &str) -> Result<ResourceStatus, TransportError> {
        self.restores.next(name)
    }

    fn get_operation(&self, name: &str) -> Result<OperationStatus, TransportError> {
        let mut ops = self.operations.borrow_mut();
        // Hold at the last scripted record once the queue is down to one.
        let front = if ops.len() > 1 {
            ops.pop_front()
        } else {
            ops.front().cloned()
        };
        front.ok_or_else(|| TransportError::Status {
            url: name.to_string(),
            status: 404,
            detail: "no scripted operation".to_string(),
        })
    }

    fn create_backup(
        &self,
        plan: &str,
        backup_id: &str,
        params: &BackupParams,
    ) -> Result<OperationStatus, TransportError> {
        self.backup_creates.borrow_mut().push(CreateCall {
            plan: plan.to_string(),
            id: backup_id.to_string(),
            body: serde_json::to_value(params).unwrap(),
        });
        Ok(OperationStatus {
            name: self.op_name.clone(),
            done: false,
            error: None,
        })
    }

    fn create_restore(
        &self,
        plan: &str,
        restore_id: &str,
        params: &RestoreParams,
    ) -> Result<OperationStatus, TransportError> {
        self.restore_creates.borrow_mut().push(CreateCall {
            plan: plan.to_string(),
            id: restore_id.to_string(),
            body: serde_json::to_value(params).unwrap(),
        });
        Ok(OperationStatus {
            name: self.op_name.clone(),
            done: false,
            error: None,
        })
    }

    fn backup_index_download_url(&self, _backup: &str) -> Result<String, TransportError> {
        Ok(self.index_url.clone())
    }
}
