//! Naming strategies for extracted executables.
//!
//! The canonical extraction keeps the manifest names so presence probes stay
//! deterministic; staged copies rename executables with a collision-resistant
//! strategy so a running staged binary never contends with another caller's
//! copy for the same file name.

use std::fmt;
use uuid::Uuid;

/// Strategy deciding the on-disk name of an executable entry.
pub trait ExecutableNaming: fmt::Debug + Send + Sync {
    /// Final file name for the entry named `entry_name`.
    fn name_for(&self, entry_name: &str) -> String;
}

/// Keeps the manifest name untouched; used for the canonical extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct OriginNaming;

impl ExecutableNaming for OriginNaming {
    fn name_for(&self, entry_name: &str) -> String {
        entry_name.to_owned()
    }
}

/// Collision-resistant rename for staged executables.
///
/// Produces `<prefix>-<uuid>-<entry_name>`, unique per call.
#[derive(Debug, Clone)]
pub struct UniqueNaming {
    prefix: String,
}

impl UniqueNaming {
    /// Naming with the given file-name prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for UniqueNaming {
    fn default() -> Self {
        Self::new("extract")
    }
}

impl ExecutableNaming for UniqueNaming {
    fn name_for(&self, entry_name: &str) -> String {
        format!("{}-{}-{}", self.prefix, Uuid::new_v4(), entry_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_naming_keeps_the_entry_name() {
        assert_eq!(OriginNaming.name_for("mongod"), "mongod");
    }

    #[test]
    fn unique_naming_retains_prefix_and_entry_name() {
        let naming = UniqueNaming::new("stage");
        let name = naming.name_for("mongod");

        assert!(name.starts_with("stage-"));
        assert!(name.ends_with("-mongod"));
    }

    #[test]
    fn unique_naming_never_repeats_itself() {
        let naming = UniqueNaming::default();
        assert_ne!(naming.name_for("mongod"), naming.name_for("mongod"));
    }
}
