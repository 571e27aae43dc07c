//! Configuration module
//!
//! Upload acceptance rules for a dropzone surface. Defaults match the
//! storefront admin (10 files per batch, 50 MiB each); everything is
//! overridable from the environment.

use std::env;

const MAX_FILES: usize = 10;
const MAX_SIZE_MIB: usize = 50;
const ACCEPTED: &str = "image/*,application/pdf,.doc,.docx,.xls,.xlsx";

/// Acceptance rules applied by the validation gate before any network call.
#[derive(Clone, Debug)]
pub struct UploadRules {
    /// Maximum batch cardinality when `multiple` is true.
    pub max_files: usize,
    /// Per-file size ceiling in bytes.
    pub max_size_bytes: i64,
    /// Accepted patterns: exact MIME types ("application/pdf"), MIME
    /// wildcards ("image/*"), or extensions (".docx").
    pub accepted: Vec<String>,
    /// Whether more than one file may be submitted per selection event.
    pub multiple: bool,
}

impl Default for UploadRules {
    fn default() -> Self {
        Self {
            max_files: MAX_FILES,
            max_size_bytes: (MAX_SIZE_MIB * 1024 * 1024) as i64,
            accepted: ACCEPTED.split(',').map(|s| s.trim().to_string()).collect(),
            multiple: true,
        }
    }
}

impl UploadRules {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let max_files = env::var("GALERIE_MAX_FILES")
            .unwrap_or_else(|_| MAX_FILES.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILES);

        let max_size_mib = env::var("GALERIE_MAX_SIZE_MIB")
            .unwrap_or_else(|_| MAX_SIZE_MIB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_SIZE_MIB);

        let accepted: Vec<String> = env::var("GALERIE_ACCEPTED_TYPES")
            .unwrap_or_else(|_| ACCEPTED.to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let multiple = env::var("GALERIE_MULTIPLE")
            .unwrap_or_else(|_| "true".to_string())
            .to_lowercase()
            .parse()
            .unwrap_or(true);

        let rules = UploadRules {
            max_files,
            max_size_bytes: (max_size_mib * 1024 * 1024) as i64,
            accepted,
            multiple,
        };

        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_files == 0 {
            return Err(anyhow::anyhow!("GALERIE_MAX_FILES must be at least 1"));
        }
        if self.max_size_bytes <= 0 {
            return Err(anyhow::anyhow!("GALERIE_MAX_SIZE_MIB must be positive"));
        }
        if self.accepted.is_empty() {
            return Err(anyhow::anyhow!(
                "GALERIE_ACCEPTED_TYPES must list at least one pattern"
            ));
        }
        Ok(())
    }
}
