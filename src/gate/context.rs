//! Gating context: the images of one rendering pass, resolved for a viewer
//!
//! A context is built whenever the image list changes and thrown away after
//! rendering. Everything that needs "the current image" receives an
//! [`ImageScope`] borrowed from it instead of looking it up ambiently.

use crate::error::GateError;
use crate::state::data::{Connection, GuardedImage, ImageDescriptor, ImageId, Viewer};

#[derive(Debug, Clone, PartialEq)]
pub struct GuardContext {
    images: Vec<GuardedImage>,
    connect: Option<Connection>,
    viewer: Viewer,
}

impl GuardContext {
    /// Resolve `descriptors` for `viewer`. Descriptors without an id are dropped.
    pub fn new(descriptors: &[ImageDescriptor], connect: Option<Connection>, viewer: Viewer) -> Self {
        let images = descriptors
            .iter()
            .filter_map(|descriptor| GuardedImage::resolve(descriptor, &viewer))
            .collect();

        Self {
            images,
            connect,
            viewer,
        }
    }

    pub fn images(&self) -> &[GuardedImage] {
        &self.images
    }

    pub fn image_ids(&self) -> Vec<ImageId> {
        self.images.iter().map(|image| image.id).collect()
    }

    pub fn connect(&self) -> Option<&Connection> {
        self.connect.as_ref()
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Scope of a single image of this context
    pub fn scope(&self, id: ImageId) -> Result<ImageScope<'_>, GateError> {
        self.images
            .iter()
            .find(|image| image.id == id)
            .map(|image| ImageScope {
                context: self,
                image,
            })
            .ok_or(GateError::ImageNotInContext(id))
    }

    /// Scopes of all images, in input order
    pub fn scopes(&self) -> impl Iterator<Item = ImageScope<'_>> {
        self.images.iter().map(move |image| ImageScope {
            context: self,
            image,
        })
    }

    /// Call `render` once per image with its scope and position
    pub fn render<T>(&self, mut render: impl FnMut(ImageScope<'_>, usize) -> T) -> Vec<T> {
        self.scopes()
            .enumerate()
            .map(|(index, scope)| render(scope, index))
            .collect()
    }
}

/// Unwrap a context that must exist for the caller to proceed
pub fn require(context: Option<&GuardContext>) -> Result<&GuardContext, GateError> {
    context.ok_or(GateError::ContextNotEstablished)
}

/// One image together with the context it is rendered in
#[derive(Debug, Clone, Copy)]
pub struct ImageScope<'a> {
    context: &'a GuardContext,
    image: &'a GuardedImage,
}

impl<'a> ImageScope<'a> {
    pub fn image(&self) -> &'a GuardedImage {
        self.image
    }

    pub fn connect(&self) -> Option<&'a Connection> {
        self.context.connect.as_ref()
    }

    pub fn viewer(&self) -> &'a Viewer {
        &self.context.viewer
    }

    pub fn context(&self) -> &'a GuardContext {
        self.context
    }
}
