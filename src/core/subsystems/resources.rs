//=========================================================================
// Resource Registries
//
// Builtin resource manager and shader program library. Both are plain
// name-keyed registries; asset formats and shader compilation are out
// of scope. The resource manager distinguishes builtin seeds (survive a
// purge) from cached entries (dropped on memory pressure).
//
//=========================================================================

use std::collections::HashMap;

use log::{debug, info};

//=== BuiltinResourceManager ==============================================

/// Kind tag for registered resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Texture,
    Material,
    Mesh,
}

struct ResourceEntry {
    kind: ResourceKind,
    builtin: bool,
}

/// Name-keyed resource registry with purgeable cache.
pub struct BuiltinResourceManager {
    entries: HashMap<String, ResourceEntry>,
}

impl BuiltinResourceManager {
    /// Creates the registry seeded with the engine's builtin resources.
    pub fn new() -> Self {
        let mut manager = Self { entries: HashMap::new() };
        manager.seed("white-texture", ResourceKind::Texture);
        manager.seed("default-material", ResourceKind::Material);
        manager.seed("unit-quad", ResourceKind::Mesh);
        info!(target: "subsystems", "BuiltinResourceManager seeded ({} builtins)", manager.len());
        manager
    }

    fn seed(&mut self, name: &str, kind: ResourceKind) {
        self.entries.insert(name.into(), ResourceEntry { kind, builtin: true });
    }

    /// Registers (or replaces) a cached resource.
    pub fn register(&mut self, name: impl Into<String>, kind: ResourceKind) {
        self.entries.insert(name.into(), ResourceEntry { kind, builtin: false });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn kind_of(&self, name: &str) -> Option<ResourceKind> {
        self.entries.get(name).map(|entry| entry.kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every cached entry, keeping builtin seeds. Invoked on
    /// device memory warnings.
    pub fn purge(&mut self) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.builtin);
        debug!(
            target: "subsystems",
            "Resource cache purged ({} entries dropped)",
            before - self.entries.len()
        );
    }

    pub fn shutdown(&mut self) {
        debug!(target: "subsystems", "BuiltinResourceManager shut down");
        self.entries.clear();
    }
}

impl Default for BuiltinResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

//=== ProgramLibrary ======================================================

/// Shader program definition; the compiled artifact is opaque here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramDef {
    pub name: String,
    pub variant_count: u32,
}

/// Name-keyed shader program registry, seeded with builtin programs.
pub struct ProgramLibrary {
    programs: HashMap<String, ProgramDef>,
}

impl ProgramLibrary {
    pub fn new() -> Self {
        let mut library = Self { programs: HashMap::new() };
        library.register(ProgramDef { name: "unlit".into(), variant_count: 1 });
        library.register(ProgramDef { name: "standard".into(), variant_count: 4 });
        info!(target: "subsystems", "ProgramLibrary seeded ({} programs)", library.len());
        library
    }

    /// Registers (or replaces) a program definition.
    pub fn register(&mut self, def: ProgramDef) {
        self.programs.insert(def.name.clone(), def);
    }

    pub fn find(&self, name: &str) -> Option<&ProgramDef> {
        self.programs.get(name)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn shutdown(&mut self) {
        debug!(target: "subsystems", "ProgramLibrary shut down");
        self.programs.clear();
    }
}

impl Default for ProgramLibrary {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // BuiltinResourceManager Tests
    //=====================================================================

    #[test]
    fn builtins_are_seeded() {
        let manager = BuiltinResourceManager::new();
        assert!(manager.contains("white-texture"));
        assert!(manager.contains("default-material"));
        assert_eq!(manager.kind_of("unit-quad"), Some(ResourceKind::Mesh));
    }

    #[test]
    fn purge_drops_cache_but_keeps_builtins() {
        let mut manager = BuiltinResourceManager::new();
        let seeded = manager.len();

        manager.register("level1-atlas", ResourceKind::Texture);
        manager.register("boss-mesh", ResourceKind::Mesh);
        assert_eq!(manager.len(), seeded + 2);

        manager.purge();

        assert_eq!(manager.len(), seeded, "only cached entries are purged");
        assert!(manager.contains("white-texture"));
        assert!(!manager.contains("level1-atlas"));
    }

    #[test]
    fn shutdown_clears_everything() {
        let mut manager = BuiltinResourceManager::new();
        manager.shutdown();
        assert!(manager.is_empty());
    }

    //=====================================================================
    // ProgramLibrary Tests
    //=====================================================================

    #[test]
    fn builtin_programs_are_seeded() {
        let library = ProgramLibrary::new();
        assert!(library.find("unlit").is_some());
        assert!(library.find("standard").is_some());
    }

    #[test]
    fn registration_replaces_by_name() {
        let mut library = ProgramLibrary::new();
        let before = library.len();

        library.register(ProgramDef { name: "unlit".into(), variant_count: 2 });

        assert_eq!(library.len(), before, "same name replaces, not adds");
        assert_eq!(library.find("unlit").unwrap().variant_count, 2);
    }

    #[test]
    fn unknown_program_is_absent() {
        let library = ProgramLibrary::new();
        assert!(library.find("volumetric-fog").is_none());
    }
}
