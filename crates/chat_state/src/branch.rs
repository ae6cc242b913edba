//! Per-branch dispatch state

use chat_core::{Branch, ModelId};

use crate::error::SelectionError;
use crate::selection::ModelSelection;

/// Loading flag, last error and selected model for one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchDispatchState {
    pub model: ModelId,
    pub loading: bool,
    pub error: Option<String>,
}

impl BranchDispatchState {
    pub fn new(model: ModelId) -> Self {
        Self {
            model,
            loading: false,
            error: None,
        }
    }
}

/// Both branches. The selected models are never equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualBranchState {
    left: BranchDispatchState,
    right: BranchDispatchState,
}

impl DualBranchState {
    pub fn new(left: ModelId, right: ModelId) -> Result<Self, SelectionError> {
        if left == right {
            return Err(SelectionError::SameModel(right));
        }
        Ok(Self {
            left: BranchDispatchState::new(left),
            right: BranchDispatchState::new(right),
        })
    }

    /// A validated selection always holds two distinct models.
    pub fn from_selection(selection: &ModelSelection) -> Self {
        Self {
            left: BranchDispatchState::new(selection.get(Branch::Left).clone()),
            right: BranchDispatchState::new(selection.get(Branch::Right).clone()),
        }
    }

    pub fn get(&self, branch: Branch) -> &BranchDispatchState {
        match branch {
            Branch::Left => &self.left,
            Branch::Right => &self.right,
        }
    }

    fn get_mut(&mut self, branch: Branch) -> &mut BranchDispatchState {
        match branch {
            Branch::Left => &mut self.left,
            Branch::Right => &mut self.right,
        }
    }

    pub fn model(&self, branch: Branch) -> &ModelId {
        &self.get(branch).model
    }

    /// Select a model for `branch`, refusing the one the other branch uses.
    pub fn set_model(&mut self, branch: Branch, model: ModelId) -> Result<(), SelectionError> {
        if self.get(branch.other()).model == model {
            return Err(SelectionError::SameModel(model));
        }
        self.get_mut(branch).model = model;
        Ok(())
    }

    /// Mark both branches loading and clear their previous errors.
    pub fn begin_dispatch(&mut self) {
        for branch in Branch::BOTH {
            let state = self.get_mut(branch);
            state.loading = true;
            state.error = None;
        }
    }

    /// One branch finished, with or without an error.
    pub fn settle(&mut self, branch: Branch, error: Option<String>) {
        let state = self.get_mut(branch);
        state.loading = false;
        state.error = error;
    }

    /// Persisting failed: both branches show the same message.
    pub fn fail_both(&mut self, message: &str) {
        for branch in Branch::BOTH {
            self.settle(branch, Some(message.to_string()));
        }
    }

    pub fn is_loading(&self) -> bool {
        self.left.loading || self.right.loading
    }
}
