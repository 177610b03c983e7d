//! Derivation tree nodes

use super::params::DerivationParams;

/// Handle to a node inside a [`DerivationTree`](super::DerivationTree).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DerivationNodeId(pub u32);

/// Named node holding the parameters for one level of stems.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DerivationNode {
    pub(super) name: String,
    params: DerivationParams,
    pub(super) parent: Option<DerivationNodeId>,
    pub(super) child: Option<DerivationNodeId>,
    pub(super) prev_sibling: Option<DerivationNodeId>,
    pub(super) next_sibling: Option<DerivationNodeId>,
}

impl DerivationNode {
    pub(super) fn with_params(params: DerivationParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// Dot-joined sibling positions from the top level, e.g. `"2.1"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &DerivationParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut DerivationParams {
        &mut self.params
    }

    pub fn parent(&self) -> Option<DerivationNodeId> {
        self.parent
    }

    /// First child.
    pub fn child(&self) -> Option<DerivationNodeId> {
        self.child
    }

    pub fn prev_sibling(&self) -> Option<DerivationNodeId> {
        self.prev_sibling
    }

    pub fn next_sibling(&self) -> Option<DerivationNodeId> {
        self.next_sibling
    }
}
