// ABOUTME: In-memory runtime double for cleanup engine tests.
// ABOUTME: Scripted failures, artificial latency, and a record of every removal call.

use crate::runtime::traits::sealed::Sealed;
use crate::runtime::{
    ContainerError, ContainerOps, ContainerState, ContainerSummary, ImageError, ImageOps,
    ImageSummary,
};
use crate::types::{ContainerId, ImageId};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn image(id: &str, tags: &[&str], size: u64) -> ImageSummary {
    ImageSummary {
        id: ImageId::new(id),
        repo_tags: tags.iter().map(|t| t.to_string()).collect(),
        size,
        created: 1_700_000_000,
        labels: HashMap::new(),
    }
}

pub fn container(id: &str, image_id: &str, state: ContainerState) -> ContainerSummary {
    ContainerSummary {
        id: ContainerId::new(id),
        name: format!("{id}-name"),
        image: image_id.to_string(),
        image_id: ImageId::new(image_id),
        state,
    }
}

#[derive(Default)]
pub struct FakeRuntime {
    images: Vec<ImageSummary>,
    containers: Vec<ContainerSummary>,
    failing_images: HashSet<String>,
    missing_images: HashSet<String>,
    failing_containers: HashSet<String>,
    panicking_images: HashSet<String>,
    fail_image_listing: bool,
    fail_container_listing: bool,
    delay: Option<Duration>,
    operations: Mutex<Vec<String>>,
    removed_images: Mutex<Vec<String>>,
    removed_containers: Mutex<Vec<String>>,
    force_flags: Mutex<Vec<bool>>,
    list_all_flags: Mutex<Vec<bool>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_images(mut self, images: Vec<ImageSummary>) -> Self {
        self.images = images;
        self
    }

    pub fn with_containers(mut self, containers: Vec<ContainerSummary>) -> Self {
        self.containers = containers;
        self
    }

    pub fn fail_image(mut self, id: &str) -> Self {
        self.failing_images.insert(id.to_string());
        self
    }

    /// Removal reports the image as already gone.
    pub fn missing_image(mut self, id: &str) -> Self {
        self.missing_images.insert(id.to_string());
        self
    }

    pub fn fail_container(mut self, id: &str) -> Self {
        self.failing_containers.insert(id.to_string());
        self
    }

    /// Removal panics, taking down whichever task made the call.
    pub fn panic_image(mut self, id: &str) -> Self {
        self.panicking_images.insert(id.to_string());
        self
    }

    pub fn fail_image_listing(mut self) -> Self {
        self.fail_image_listing = true;
        self
    }

    pub fn fail_container_listing(mut self) -> Self {
        self.fail_container_listing = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn operations(&self) -> Vec<String> {
        self.operations.lock().clone()
    }

    /// Every image removal attempt, successful or not, in call order.
    pub fn image_attempts(&self) -> Vec<String> {
        self.operations
            .lock()
            .iter()
            .filter_map(|op| op.strip_prefix("image:").map(str::to_string))
            .collect()
    }

    pub fn removed_images(&self) -> Vec<String> {
        self.removed_images.lock().clone()
    }

    pub fn removed_containers(&self) -> Vec<String> {
        self.removed_containers.lock().clone()
    }

    pub fn force_flags(&self) -> Vec<bool> {
        self.force_flags.lock().clone()
    }

    pub fn list_all_flags(&self) -> Vec<bool> {
        self.list_all_flags.lock().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl Sealed for FakeRuntime {}

#[async_trait]
impl ImageOps for FakeRuntime {
    async fn list_images(&self, all: bool) -> Result<Vec<ImageSummary>, ImageError> {
        self.list_all_flags.lock().push(all);
        if self.fail_image_listing {
            return Err(ImageError::Runtime("daemon unavailable".to_string()));
        }
        Ok(self.images.clone())
    }

    async fn remove_image(&self, id: &ImageId, force: bool) -> Result<(), ImageError> {
        self.operations.lock().push(format!("image:{id}"));
        self.force_flags.lock().push(force);
        if self.panicking_images.contains(id.as_str()) {
            panic!("runtime client panicked removing {id}");
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.missing_images.contains(id.as_str()) {
            return Err(ImageError::NotFound(id.to_string()));
        }
        if self.failing_images.contains(id.as_str()) {
            return Err(ImageError::InUse(format!("{id}: image is being used")));
        }
        self.removed_images.lock().push(id.to_string());
        Ok(())
    }
}

#[async_trait]
impl ContainerOps for FakeRuntime {
    async fn list_containers(&self, _all: bool) -> Result<Vec<ContainerSummary>, ContainerError> {
        if self.fail_container_listing {
            return Err(ContainerError::Runtime("daemon unavailable".to_string()));
        }
        Ok(self.containers.clone())
    }

    async fn remove_container(&self, id: &ContainerId, _force: bool) -> Result<(), ContainerError> {
        self.operations.lock().push(format!("container:{id}"));
        if self.failing_containers.contains(id.as_str()) {
            return Err(ContainerError::Conflict(format!("{id}: removal in progress")));
        }
        self.removed_containers.lock().push(id.to_string());
        Ok(())
    }
}
