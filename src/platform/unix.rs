use crate::platform::PlatformOps;
use anyhow::{Context, Result};
use fs_err as fs;
use std::path::Path;

pub static UNIX_PLATFORM: Unix = Unix;

pub struct Unix;

impl PlatformOps for Unix {
    fn final_binary_name(&self, base: &str) -> String {
        base.to_string()
    }
    fn make_executable(&self, path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms).with_context(|| format!("chmod 755 {}", path.display()))?;
        Ok(())
    }
}
