//! FUSE mount options.

use fuser::MountOption;
use std::path::Path;

/// Filesystem subtype shown in the mount table (`fuse.shrinkfs`).
pub const DEFAULT_SUBTYPE: &str = "shrinkfs";

/// Options for mounting the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountConfig {
    /// Shown as the device column of the mount table.
    pub fsname: String,
    pub subtype: String,
    /// macOS volume name, shown in Finder.
    pub volume_name: Option<String>,
    pub read_only: bool,
    /// macOS: mark the volume local so Finder treats it like a disk.
    pub local: bool,
}

impl MountConfig {
    /// Options for mirroring `source`.
    ///
    /// The volume name and local flag are only set on macOS.
    pub fn for_source(source: &Path) -> Self {
        let volume_name = cfg!(target_os = "macos").then(|| DEFAULT_SUBTYPE.to_string());

        Self {
            fsname: source.display().to_string(),
            subtype: DEFAULT_SUBTYPE.to_string(),
            volume_name,
            read_only: true,
            local: cfg!(target_os = "macos"),
        }
    }

    pub fn with_volume_name(mut self, name: impl Into<String>) -> Self {
        self.volume_name = Some(name.into());
        self
    }

    pub fn with_local(mut self, local: bool) -> Self {
        self.local = local;
        self
    }

    pub fn to_mount_options(&self) -> Vec<MountOption> {
        let mut options = vec![
            MountOption::FSName(self.fsname.clone()),
            MountOption::Subtype(self.subtype.clone()),
            MountOption::NoDev,
            MountOption::NoSuid,
        ];
        if self.read_only {
            options.push(MountOption::RO);
        }
        if let Some(name) = &self.volume_name {
            options.push(MountOption::CUSTOM(format!("volname={}", name)));
        }
        if self.local {
            options.push(MountOption::CUSTOM("local".to_string()));
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_source() {
        let config = MountConfig::for_source(Path::new("/data/photos"));

        assert_eq!(config.fsname, "/data/photos");
        assert_eq!(config.subtype, "shrinkfs");
        assert!(config.read_only);
        if cfg!(target_os = "macos") {
            assert_eq!(config.volume_name.as_deref(), Some("shrinkfs"));
            assert!(config.local);
        } else {
            assert!(config.volume_name.is_none());
            assert!(!config.local);
        }
    }

    #[test]
    fn test_options_are_read_only() {
        let options = MountConfig::for_source(Path::new("/src")).to_mount_options();

        assert!(options.contains(&MountOption::RO));
        assert!(options.contains(&MountOption::FSName("/src".to_string())));
        assert!(options.contains(&MountOption::Subtype("shrinkfs".to_string())));
        assert!(!options.contains(&MountOption::RW));
    }

    #[test]
    fn test_macos_style_options() {
        let options = MountConfig::for_source(Path::new("/src"))
            .with_volume_name("Small Photos")
            .with_local(true)
            .to_mount_options();

        assert!(options.contains(&MountOption::CUSTOM("volname=Small Photos".to_string())));
        assert!(options.contains(&MountOption::CUSTOM("local".to_string())));
    }
}
