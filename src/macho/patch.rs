//! In-place editing of the Mach-O load-command region
//!
//! Edits work on the parsed [`MachFile`] and are materialized by
//! [`MachFile::patch`], which re-serializes the command region into the
//! padding between the header and the first section's data. Growing past
//! that padding fails; the binary would need to be relinked with a larger
//! `-headerpad`.

use super::{HEADER_SIZE, LC_RPATH, LoadCommand, MachFile, MachoError};

/// Round up to the 8-byte load-command alignment of 64-bit Mach-O
pub fn align8(n: usize) -> usize {
    (n + 7) & !7
}

/// Serialize a path into a load command's trailing string area
fn push_lc_string(buf: &mut Vec<u8>, path: &str, cmdsize: usize) {
    buf.extend_from_slice(path.as_bytes());
    buf.push(0);
    buf.resize(cmdsize, 0);
}

impl MachFile {
    /// Rewrite every dylib load command (including LC_ID_DYLIB) whose path
    /// exactly equals `from`. Returns the number of commands changed.
    pub fn rewrite_dylib(&mut self, from: &str, to: &str) -> usize {
        let mut changed = 0;
        for command in &mut self.commands {
            let LoadCommand::Dylib {
                name_offset,
                path,
                raw,
                ..
            } = command
            else {
                continue;
            };
            if path != from {
                continue;
            }

            let prefix = *name_offset as usize;
            let cmdsize = align8(prefix + to.len() + 1);
            let mut rebuilt = Vec::with_capacity(cmdsize);
            rebuilt.extend_from_slice(&raw[..prefix]);
            rebuilt[4..8].copy_from_slice(&(cmdsize as u32).to_le_bytes());
            push_lc_string(&mut rebuilt, to, cmdsize);

            *raw = rebuilt;
            *path = to.to_string();
            changed += 1;
        }
        changed
    }

    /// Register a runtime search path unless an identical one already exists.
    /// Returns false when the rpath was already present.
    pub fn add_rpath(&mut self, path: &str) -> bool {
        if self.rpaths().contains(&path) {
            return false;
        }

        // rpath_command: cmd, cmdsize, lc_str offset (fixed 12)
        let cmdsize = align8(12 + path.len() + 1);
        let mut raw = Vec::with_capacity(cmdsize);
        raw.extend_from_slice(&LC_RPATH.to_le_bytes());
        raw.extend_from_slice(&(cmdsize as u32).to_le_bytes());
        raw.extend_from_slice(&12u32.to_le_bytes());
        push_lc_string(&mut raw, path, cmdsize);

        self.commands.push(LoadCommand::Rpath {
            path: path.to_string(),
            raw,
        });
        true
    }

    /// Re-serialize the load-command region into a copy of the original file.
    ///
    /// Only bytes between the header and the first section's data change;
    /// everything else is carried over verbatim.
    pub fn patch(&self, original: &[u8]) -> Result<Vec<u8>, MachoError> {
        if original.len() != self.file_len {
            return Err(MachoError::Patch(
                "file changed size since it was parsed".to_string(),
            ));
        }

        let sizeofcmds: usize = self.commands.iter().map(LoadCommand::size).sum();
        let new_end = HEADER_SIZE + sizeofcmds;
        let floor = self.code_offset.min(original.len());
        if new_end > floor {
            return Err(MachoError::Patch(format!(
                "rewritten load commands ({new_end} bytes) exceed the header padding \
                 ({floor} bytes); relink the binary with a larger -headerpad"
            )));
        }

        let mut out = original.to_vec();
        out[..HEADER_SIZE].copy_from_slice(&self.header);
        out[16..20].copy_from_slice(&(self.commands.len() as u32).to_le_bytes());
        out[20..24].copy_from_slice(&(sizeofcmds as u32).to_le_bytes());

        let mut offset = HEADER_SIZE;
        for command in &self.commands {
            let raw = match command {
                LoadCommand::Dylib { raw, .. }
                | LoadCommand::Rpath { raw, .. }
                | LoadCommand::Other { raw, .. } => raw,
            };
            out[offset..offset + raw.len()].copy_from_slice(raw);
            offset += raw.len();
        }

        // Wipe any stale command bytes left from the original region
        let old_end = self.cmds_end.min(original.len());
        if old_end > offset {
            out[offset..old_end].fill(0);
        }

        Ok(out)
    }
}


#[cfg(test)]
mod tests {
    use super::testutil::MachBuilder;
    use crate::macho::{MachFile, MachoError};

    const OLD: &str = "/Library/Frameworks/Python.framework/Versions/3.10/Python";
    const NEW: &str = "@rpath/Python.framework/Versions/3.10/Python";
    const RPATH: &str = "@executable_path/../Frameworks";

    fn sample() -> Vec<u8> {
        MachBuilder::new()
            .load_dylib("/usr/lib/libSystem.B.dylib")
            .load_dylib(OLD)
            .build()
    }

    #[test]
    fn test_rewrite_replaces_exact_match_only() {
        let data = sample();
        let mut macho = MachFile::parse(&data).unwrap();

        assert_eq!(macho.rewrite_dylib(OLD, NEW), 1);
        assert_eq!(
            macho.dylib_paths(),
            vec!["/usr/lib/libSystem.B.dylib", NEW]
        );
    }

    #[test]
    fn test_rewrite_no_match_counts_zero() {
        let data = sample();
        let mut macho = MachFile::parse(&data).unwrap();
        assert_eq!(macho.rewrite_dylib("/Library/Frameworks/Tcl", "@rpath/Tcl"), 0);
    }

    #[test]
    fn test_rewrite_id_dylib() {
        let data = MachBuilder::new().dylib_id(OLD).build();
        let mut macho = MachFile::parse(&data).unwrap();
        assert_eq!(macho.rewrite_dylib(OLD, NEW), 1);
        assert_eq!(macho.id(), Some(NEW));
    }

    #[test]
    fn test_patch_round_trip() {
        let data = sample();
        let mut macho = MachFile::parse(&data).unwrap();
        macho.rewrite_dylib(OLD, NEW);
        assert!(macho.add_rpath(RPATH));

        let patched = macho.patch(&data).unwrap();
        assert_eq!(patched.len(), data.len());

        let reparsed = MachFile::parse(&patched).unwrap();
        assert_eq!(
            reparsed.dylib_paths(),
            vec!["/usr/lib/libSystem.B.dylib", NEW]
        );
        assert_eq!(reparsed.rpaths(), vec![RPATH]);
        // Section data untouched
        assert_eq!(
            &patched[MachBuilder::TEXT_OFFSET..],
            &data[MachBuilder::TEXT_OFFSET..]
        );
    }

    #[test]
    fn test_patch_leaves_no_stale_reference() {
        let data = sample();
        let mut macho = MachFile::parse(&data).unwrap();
        // Shrinking rewrite leaves a tail of old command bytes to wipe
        macho.rewrite_dylib(OLD, "@rpath/Py");
        let patched = macho.patch(&data).unwrap();

        let needle = OLD.as_bytes();
        let found = patched.windows(needle.len()).any(|w| w == needle);
        assert!(!found, "old absolute path must not survive anywhere");
    }

    #[test]
    fn test_add_rpath_is_idempotent() {
        let data = sample();
        let mut macho = MachFile::parse(&data).unwrap();
        assert!(macho.add_rpath(RPATH));
        assert!(!macho.add_rpath(RPATH));
        assert_eq!(macho.rpaths(), vec![RPATH]);
    }

    #[test]
    fn test_patch_rejects_growth_past_header_padding() {
        let data = sample();
        let mut macho = MachFile::parse(&data).unwrap();
        // A pathological rpath larger than the available padding
        let huge = format!("@executable_path/{}", "x".repeat(8192));
        macho.add_rpath(&huge);

        let err = macho.patch(&data).unwrap_err();
        assert!(matches!(err, MachoError::Patch(_)));
        assert!(err.to_string().contains("headerpad"));
    }

    #[test]
    fn test_patch_rejects_size_change() {
        let data = sample();
        let macho = MachFile::parse(&data).unwrap();
        let mut truncated = data.clone();
        truncated.truncate(data.len() - 1);
        assert!(macho.patch(&truncated).is_err());
    }
}
