// ABOUTME: Per-image reference state derived from the container inventory.
// ABOUTME: Images referenced only by exited containers become removal candidates.

use super::removal::RemovalTarget;
use crate::runtime::{ContainerState, ContainerSummary, ImageSummary};
use crate::types::{ContainerId, ImageId};
use std::collections::HashMap;

/// How an image is referenced by containers.
///
/// Ordered so that merging two observations is `max`: once any container keeps
/// an image `Active` no later observation can demote it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ClassificationState {
    /// No container references the image.
    #[default]
    Unreferenced,
    /// Every referencing container has exited.
    Exited,
    /// At least one referencing container is in any state other than `exited`.
    Active,
}

impl ClassificationState {
    /// The observation a single container contributes.
    pub fn observe(state: ContainerState) -> Self {
        if state.is_exited() {
            ClassificationState::Exited
        } else {
            ClassificationState::Active
        }
    }

    pub fn merge(self, other: Self) -> Self {
        self.max(other)
    }
}

/// Immutable result of classifying an image snapshot against a container snapshot.
#[derive(Debug, Clone)]
pub struct Classification {
    images: Vec<ImageSummary>,
    states: HashMap<ImageId, ClassificationState>,
    exited: HashMap<ImageId, Vec<ContainerId>>,
}

impl Classification {
    /// State of `id`, or `None` if the image was not in the snapshot.
    pub fn state(&self, id: &ImageId) -> Option<ClassificationState> {
        self.states.get(id).copied()
    }

    /// Exited containers recorded against `id`, in container input order.
    pub fn exited_containers(&self, id: &ImageId) -> &[ContainerId] {
        self.exited.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Images whose final state is `Exited`, in image input order, each paired
    /// with the containers to remove after it.
    pub fn removal_candidates(&self) -> Vec<RemovalTarget> {
        self.images
            .iter()
            .filter(|image| self.state(&image.id) == Some(ClassificationState::Exited))
            .map(|image| RemovalTarget {
                image: image.clone(),
                containers: self.exited_containers(&image.id).to_vec(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Fold the container snapshot into a per-image state.
///
/// Containers whose image is not in `images` are ignored.
pub fn classify(images: Vec<ImageSummary>, containers: &[ContainerSummary]) -> Classification {
    let mut states: HashMap<ImageId, ClassificationState> = images
        .iter()
        .map(|image| (image.id.clone(), ClassificationState::default()))
        .collect();
    let mut exited: HashMap<ImageId, Vec<ContainerId>> = HashMap::new();

    for container in containers {
        let Some(state) = states.get_mut(&container.image_id) else {
            tracing::debug!(
                container = %container.id,
                image = %container.image_id,
                "container references an image outside the snapshot"
            );
            continue;
        };

        let observed = ClassificationState::observe(container.state);
        *state = state.merge(observed);

        if observed == ClassificationState::Exited {
            exited
                .entry(container.image_id.clone())
                .or_default()
                .push(container.id.clone());
        }
    }

    Classification {
        images,
        states,
        exited,
    }
}
