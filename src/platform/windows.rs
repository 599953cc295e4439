use crate::platform::PlatformOps;
use anyhow::Result;
use std::path::Path;

pub static WINDOWS_PLATFORM: Windows = Windows;

pub struct Windows;

impl PlatformOps for Windows {
    fn final_binary_name(&self, base: &str) -> String { if base.ends_with(".exe") { base.to_string() } else { format!("{base}.exe") } }
    fn make_executable(&self, _path: &Path) -> Result<()> { Ok(()) }
}
