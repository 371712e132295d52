//! The capability registry.
//!
//! Registration happens on a [`RegistryBuilder`]. Once every collaborator has
//! registered, [`RegistryBuilder::build`] consumes the builder and returns a
//! [`Registry`]. The registry exposes lookups and listings only, so nothing can
//! be added or removed after a transport has started.
//!
//! Each kind has its own partition, backed by an [`IndexMap`] so listings come
//! back in registration order on every call.

use std::fmt;

use indexmap::IndexMap;
use tracing::debug;

use crate::capability::{
    CapabilityKind, Descriptor, PromptBuilder, PromptDescriptor, ResourceDescriptor,
    ResourceReader, ToolDescriptor, ToolHandler,
};
use crate::error::RegistryError;

struct Entry<D, H: ?Sized> {
    descriptor: D,
    handler: Box<H>,
}

/// One kind's entries, keyed by [`Descriptor::key`].
struct Partition<D, H: ?Sized> {
    entries: IndexMap<String, Entry<D, H>>,
}

impl<D: Descriptor, H: ?Sized> Partition<D, H> {
    fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    fn insert(&mut self, descriptor: D, handler: Box<H>) -> Result<(), RegistryError> {
        if self.entries.contains_key(descriptor.key()) {
            return Err(RegistryError::DuplicateName {
                kind: D::KIND,
                name: descriptor.key().to_string(),
            });
        }
        // Resources are keyed by URI, but their names must stay unique too.
        if self
            .entries
            .values()
            .any(|entry| entry.descriptor.name() == descriptor.name())
        {
            return Err(RegistryError::DuplicateName {
                kind: D::KIND,
                name: descriptor.name().to_string(),
            });
        }

        debug!(kind = %D::KIND, name = descriptor.name(), "registered capability");
        self.entries
            .insert(descriptor.key().to_string(), Entry { descriptor, handler });
        Ok(())
    }

    fn get(&self, key: &str) -> Result<(&D, &H), RegistryError> {
        self.entries
            .get(key)
            .map(|entry| (&entry.descriptor, &*entry.handler))
            .ok_or_else(|| RegistryError::NotFound {
                kind: D::KIND,
                name: key.to_string(),
            })
    }

    fn descriptors(&self) -> impl ExactSizeIterator<Item = &D> + Clone + '_ {
        self.entries.values().map(|entry| &entry.descriptor)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }
}

/// Mutable registration surface, used only during start-up.
pub struct RegistryBuilder {
    tools: Partition<ToolDescriptor, dyn ToolHandler>,
    resources: Partition<ResourceDescriptor, dyn ResourceReader>,
    prompts: Partition<PromptDescriptor, dyn PromptBuilder>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: Partition::new(),
            resources: Partition::new(),
            prompts: Partition::new(),
        }
    }

    /// Registers a tool.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if a tool with the same name
    /// is already registered.
    pub fn register_tool<H>(
        &mut self,
        descriptor: ToolDescriptor,
        handler: H,
    ) -> Result<&mut Self, RegistryError>
    where
        H: ToolHandler + 'static,
    {
        self.tools.insert(descriptor, Box::new(handler))?;
        Ok(self)
    }

    /// Registers a resource.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if a resource with the same
    /// URI or name is already registered.
    pub fn register_resource<R>(
        &mut self,
        descriptor: ResourceDescriptor,
        reader: R,
    ) -> Result<&mut Self, RegistryError>
    where
        R: ResourceReader + 'static,
    {
        self.resources.insert(descriptor, Box::new(reader))?;
        Ok(self)
    }

    /// Registers a prompt.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if a prompt with the same name
    /// is already registered.
    pub fn register_prompt<B>(
        &mut self,
        descriptor: PromptDescriptor,
        builder: B,
    ) -> Result<&mut Self, RegistryError>
    where
        B: PromptBuilder + 'static,
    {
        self.prompts.insert(descriptor, Box::new(builder))?;
        Ok(self)
    }

    /// Freezes the registrations into a read-only [`Registry`].
    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            tools: self.tools,
            resources: self.resources,
            prompts: self.prompts,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .field("resources", &self.resources.keys().collect::<Vec<_>>())
            .field("prompts", &self.prompts.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Read-only set of registered capabilities.
pub struct Registry {
    tools: Partition<ToolDescriptor, dyn ToolHandler>,
    resources: Partition<ResourceDescriptor, dyn ResourceReader>,
    prompts: Partition<PromptDescriptor, dyn PromptBuilder>,
}

impl Registry {
    /// Returns an empty registry.
    #[must_use]
    pub fn empty() -> Self {
        RegistryBuilder::new().build()
    }

    /// Looks up a tool by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no such tool is registered.
    pub fn tool(&self, name: &str) -> Result<(&ToolDescriptor, &dyn ToolHandler), RegistryError> {
        self.tools.get(name)
    }

    /// Looks up a resource by URI.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no resource has this URI.
    pub fn resource(
        &self,
        uri: &str,
    ) -> Result<(&ResourceDescriptor, &dyn ResourceReader), RegistryError> {
        self.resources.get(uri)
    }

    /// Looks up a prompt by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no such prompt is registered.
    pub fn prompt(
        &self,
        name: &str,
    ) -> Result<(&PromptDescriptor, &dyn PromptBuilder), RegistryError> {
        self.prompts.get(name)
    }

    /// Tool descriptors in registration order.
    pub fn tools(&self) -> impl ExactSizeIterator<Item = &ToolDescriptor> + Clone + '_ {
        self.tools.descriptors()
    }

    /// Resource descriptors in registration order.
    pub fn resources(&self) -> impl ExactSizeIterator<Item = &ResourceDescriptor> + Clone + '_ {
        self.resources.descriptors()
    }

    /// Prompt descriptors in registration order.
    pub fn prompts(&self) -> impl ExactSizeIterator<Item = &PromptDescriptor> + Clone + '_ {
        self.prompts.descriptors()
    }

    /// Number of registered capabilities of `kind`.
    #[must_use]
    pub fn count(&self, kind: CapabilityKind) -> usize {
        match kind {
            CapabilityKind::Tool => self.tools.len(),
            CapabilityKind::Resource => self.resources.len(),
            CapabilityKind::Prompt => self.prompts.len(),
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .field("resources", &self.resources.keys().collect::<Vec<_>>())
            .field("prompts", &self.prompts.keys().collect::<Vec<_>>())
            .finish()
    }
}
