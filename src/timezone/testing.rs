//! In-memory timezone tool for tests

use std::cell::RefCell;
use std::rc::Rc;

use super::{TimezoneTool, UNKNOWN_TIMEZONE};
use crate::error::{BackupError, BackupResult};

/// How [`FakeTimezone::set_timezone`] behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetBehavior {
    Succeed,
    NotElevated,
    ToolFails,
}

/// Records every applied label; clones share the record
#[derive(Debug, Clone)]
pub struct FakeTimezone {
    current: String,
    behavior: SetBehavior,
    applied: Rc<RefCell<Vec<String>>>,
}

impl FakeTimezone {
    pub fn new(current: &str) -> Self {
        Self {
            current: current.to_string(),
            behavior: SetBehavior::Succeed,
            applied: Rc::default(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN_TIMEZONE)
    }

    pub fn with_behavior(mut self, behavior: SetBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn applied(&self) -> Vec<String> {
        self.applied.borrow().clone()
    }
}

impl TimezoneTool for FakeTimezone {
    fn current_label(&self) -> String {
        self.current.clone()
    }

    fn available_labels(&self) -> Vec<String> {
        vec![self.current.clone()]
    }

    fn set_timezone(&self, label: &str) -> BackupResult<()> {
        match self.behavior {
            SetBehavior::Succeed => {
                self.applied.borrow_mut().push(label.to_string());
                Ok(())
            }
            SetBehavior::NotElevated => Err(BackupError::PermissionDenied(
                "administrator privileges are required".into(),
            )),
            SetBehavior::ToolFails => Err(BackupError::OperationFailed(
                "tzutil /s exited with 1: invalid time zone".into(),
            )),
        }
    }
}
