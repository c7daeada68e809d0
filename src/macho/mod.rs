//! Minimal Mach-O load-command reader and editor
//!
//! macbundle patches binaries itself instead of shelling out to
//! `install_name_tool`, so relocation works the same everywhere and failures
//! surface as structured errors. Only the load-command region is touched:
//! the file is parsed into a header plus a list of commands, dylib paths and
//! rpaths are edited, and the region is re-serialized into the padding
//! between the header and the first section's data.
//!
//! Scope: thin little-endian 64-bit Mach-O files (arm64/x86_64). Universal
//! (fat) and 32-bit binaries are rejected up front.

mod patch;

#[cfg(test)]
pub(crate) use patch::testutil;

use std::fmt;

pub const MH_MAGIC_64: u32 = 0xFEED_FACF;
pub const MH_CIGAM_64: u32 = 0xCFFA_EDFE;
pub const MH_MAGIC_32: u32 = 0xFEED_FACE;
pub const FAT_MAGIC: u32 = 0xCAFE_BABE;

/// mach_header_64 is eight u32 fields
pub const HEADER_SIZE: usize = 32;

pub const LC_LOAD_DYLIB: u32 = 0x0C;
pub const LC_ID_DYLIB: u32 = 0x0D;
pub const LC_SEGMENT_64: u32 = 0x19;
pub const LC_LOAD_WEAK_DYLIB: u32 = 0x8000_0018;
pub const LC_RPATH: u32 = 0x8000_001C;
pub const LC_REEXPORT_DYLIB: u32 = 0x8000_001F;

/// Errors from parsing or re-serializing a Mach-O file.
///
/// Deliberately path-free; callers attach the file path when mapping into
/// [`crate::error::MacbundleError`].
#[derive(Debug)]
pub enum MachoError {
    /// Not a thin 64-bit little-endian Mach-O file
    Unrecognized(String),
    /// Structurally a Mach-O file, but the edit cannot be applied
    Patch(String),
}

impl fmt::Display for MachoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachoError::Unrecognized(reason) | MachoError::Patch(reason) => f.write_str(reason),
        }
    }
}

/// Which dylib load command a path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DylibKind {
    /// LC_ID_DYLIB: the library's own install name
    Id,
    /// LC_LOAD_DYLIB
    Load,
    /// LC_LOAD_WEAK_DYLIB
    Weak,
    /// LC_REEXPORT_DYLIB
    Reexport,
}

impl DylibKind {
    fn from_cmd(cmd: u32) -> Option<Self> {
        match cmd {
            LC_ID_DYLIB => Some(DylibKind::Id),
            LC_LOAD_DYLIB => Some(DylibKind::Load),
            LC_LOAD_WEAK_DYLIB => Some(DylibKind::Weak),
            LC_REEXPORT_DYLIB => Some(DylibKind::Reexport),
            _ => None,
        }
    }
}

/// One parsed load command
#[derive(Debug, Clone)]
pub enum LoadCommand {
    /// A dylib reference (LC_ID_DYLIB / LC_LOAD_DYLIB / weak / reexport)
    Dylib {
        kind: DylibKind,
        /// Offset of the path string within the command (dylib.name)
        name_offset: u32,
        path: String,
        raw: Vec<u8>,
    },
    /// An LC_RPATH runtime search path
    Rpath { path: String, raw: Vec<u8> },
    /// Any command macbundle does not edit, kept verbatim
    Other { cmd: u32, raw: Vec<u8> },
}

impl LoadCommand {
    /// Serialized size of this command in bytes
    pub fn size(&self) -> usize {
        match self {
            LoadCommand::Dylib { raw, .. }
            | LoadCommand::Rpath { raw, .. }
            | LoadCommand::Other { raw, .. } => raw.len(),
        }
    }
}

/// A parsed thin 64-bit Mach-O file
#[derive(Debug)]
pub struct MachFile {
    /// Original mach_header_64 bytes; ncmds/sizeofcmds are recomputed on write
    header: [u8; HEADER_SIZE],
    /// Load commands in file order
    pub commands: Vec<LoadCommand>,
    /// Smallest file offset of any section's data; the load-command region
    /// must stay below this when re-serialized
    code_offset: usize,
    /// End of the original load-command region, so stale bytes can be wiped
    cmds_end: usize,
    /// Size of the whole file, for bounds checks on write
    file_len: usize,
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32, MachoError> {
    let bytes: [u8; 4] = data
        .get(offset..offset + 4)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| MachoError::Unrecognized("file truncated".to_string()))?;
    Ok(u32::from_le_bytes(bytes))
}

fn read_u64(data: &[u8], offset: usize) -> Result<u64, MachoError> {
    let bytes: [u8; 8] = data
        .get(offset..offset + 8)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| MachoError::Unrecognized("file truncated".to_string()))?;
    Ok(u64::from_le_bytes(bytes))
}

/// Extract a NUL-terminated string from a load command's trailing bytes
fn read_lc_string(raw: &[u8], offset: usize) -> Result<String, MachoError> {
    let tail = raw
        .get(offset..)
        .ok_or_else(|| MachoError::Unrecognized("string offset beyond command".to_string()))?;
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    String::from_utf8(tail[..end].to_vec())
        .map_err(|_| MachoError::Unrecognized("load command path is not UTF-8".to_string()))
}

fn classify_magic(data: &[u8]) -> Result<(), MachoError> {
    if data.len() < HEADER_SIZE {
        return Err(MachoError::Unrecognized(
            "file too small for a Mach-O header".to_string(),
        ));
    }
    let le = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let be = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);

    if le == MH_MAGIC_64 {
        return Ok(());
    }
    if be == FAT_MAGIC {
        return Err(MachoError::Unrecognized(
            "universal (fat) binaries are not supported; thin the binary first".to_string(),
        ));
    }
    if le == MH_MAGIC_32 || be == MH_MAGIC_32 {
        return Err(MachoError::Unrecognized(
            "32-bit Mach-O binaries are not supported".to_string(),
        ));
    }
    if le == MH_CIGAM_64 {
        return Err(MachoError::Unrecognized(
            "byte-swapped Mach-O binaries are not supported".to_string(),
        ));
    }
    Err(MachoError::Unrecognized("not a Mach-O file".to_string()))
}

impl MachFile {
    /// Parse a thin 64-bit Mach-O file
    pub fn parse(data: &[u8]) -> Result<Self, MachoError> {
        classify_magic(data)?;

        let ncmds = read_u32(data, 16)? as usize;
        let sizeofcmds = read_u32(data, 20)? as usize;

        let cmds_end = HEADER_SIZE
            .checked_add(sizeofcmds)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| {
                MachoError::Unrecognized("load commands extend beyond the file".to_string())
            })?;

        let mut header = [0u8; HEADER_SIZE];
        header.copy_from_slice(&data[..HEADER_SIZE]);

        let mut commands = Vec::with_capacity(ncmds);
        let mut code_offset = data.len();
        let mut offset = HEADER_SIZE;

        for _ in 0..ncmds {
            let cmd = read_u32(data, offset)?;
            let cmdsize = read_u32(data, offset + 4)? as usize;
            if cmdsize < 8 || offset + cmdsize > cmds_end {
                return Err(MachoError::Unrecognized(format!(
                    "load command at offset {offset} has invalid size {cmdsize}"
                )));
            }
            let raw = data[offset..offset + cmdsize].to_vec();

            let command = if let Some(kind) = DylibKind::from_cmd(cmd) {
                let name_offset = read_u32(&raw, 8)?;
                if name_offset < 24 {
                    return Err(MachoError::Unrecognized(format!(
                        "dylib command has name offset {name_offset} inside its own header"
                    )));
                }
                let path = read_lc_string(&raw, name_offset as usize)?;
                LoadCommand::Dylib {
                    kind,
                    name_offset,
                    path,
                    raw,
                }
            } else if cmd == LC_RPATH {
                let path_offset = read_u32(&raw, 8)?;
                if path_offset < 12 {
                    return Err(MachoError::Unrecognized(format!(
                        "rpath command has path offset {path_offset} inside its own header"
                    )));
                }
                let path = read_lc_string(&raw, path_offset as usize)?;
                LoadCommand::Rpath { path, raw }
            } else {
                if cmd == LC_SEGMENT_64 {
                    code_offset = code_offset.min(segment_data_floor(&raw)?);
                }
                LoadCommand::Other { cmd, raw }
            };

            commands.push(command);
            offset += cmdsize;
        }

        Ok(MachFile {
            header,
            commands,
            code_offset,
            cmds_end,
            file_len: data.len(),
        })
    }

    /// The library's own install name, if this is a dylib
    pub fn id(&self) -> Option<&str> {
        self.commands.iter().find_map(|c| match c {
            LoadCommand::Dylib {
                kind: DylibKind::Id,
                path,
                ..
            } => Some(path.as_str()),
            _ => None,
        })
    }

    /// Paths of all dependent dylib load commands (excluding LC_ID_DYLIB)
    pub fn dylib_paths(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                LoadCommand::Dylib { kind, path, .. } if *kind != DylibKind::Id => {
                    Some(path.as_str())
                }
                _ => None,
            })
            .collect()
    }

    /// All registered runtime search paths
    pub fn rpaths(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                LoadCommand::Rpath { path, .. } => Some(path.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Smallest file offset of section data inside an LC_SEGMENT_64 command.
///
/// Section data must not be overwritten when the load-command region grows;
/// sections with offset 0 (zero-fill) carry no file data.
fn segment_data_floor(raw: &[u8]) -> Result<usize, MachoError> {
    const SEGMENT_HEADER: usize = 72;
    const SECTION_SIZE: usize = 80;

    let nsects = read_u32(raw, 64)? as usize;
    let mut floor = usize::MAX;
    for i in 0..nsects {
        let base = SEGMENT_HEADER + i * SECTION_SIZE;
        let size = read_u64(raw, base + 40)?;
        let offset = read_u32(raw, base + 48)? as usize;
        if size > 0 && offset > 0 {
            floor = floor.min(offset);
        }
    }
    if floor == usize::MAX {
        // No mapped sections in this segment
        return Ok(usize::MAX);
    }
    Ok(floor)
}
