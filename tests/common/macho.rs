//! Builder for synthetic thin 64-bit Mach-O files
//!
//! Integration tests cannot reach the crate's internal test utilities, so
//! the minimal layout is assembled here as well: a mach_header_64, a __TEXT
//! segment with one section whose data starts at a fixed offset, and the
//! dylib/rpath load commands under test.

const MH_MAGIC_64: u32 = 0xFEED_FACF;
const LC_LOAD_DYLIB: u32 = 0x0C;
const LC_ID_DYLIB: u32 = 0x0D;
const LC_SEGMENT_64: u32 = 0x19;
const LC_RPATH: u32 = 0x8000_001C;

/// File offset where the synthetic __text section's data starts
#[allow(dead_code)]
pub const TEXT_OFFSET: usize = 4096;

fn align8(n: usize) -> usize {
    (n + 7) & !7
}

fn name16(name: &str) -> [u8; 16] {
    let mut out = [0u8; 16];
    out[..name.len()].copy_from_slice(name.as_bytes());
    out
}

fn dylib_cmd(cmd: u32, path: &str) -> Vec<u8> {
    let cmdsize = align8(24 + path.len() + 1);
    let mut raw = Vec::with_capacity(cmdsize);
    raw.extend_from_slice(&cmd.to_le_bytes());
    raw.extend_from_slice(&(cmdsize as u32).to_le_bytes());
    raw.extend_from_slice(&24u32.to_le_bytes());
    raw.extend_from_slice(&2u32.to_le_bytes());
    raw.extend_from_slice(&0x0001_0000u32.to_le_bytes());
    raw.extend_from_slice(&0x0001_0000u32.to_le_bytes());
    raw.extend_from_slice(path.as_bytes());
    raw.push(0);
    raw.resize(cmdsize, 0);
    raw
}

fn rpath_cmd(path: &str) -> Vec<u8> {
    let cmdsize = align8(12 + path.len() + 1);
    let mut raw = Vec::with_capacity(cmdsize);
    raw.extend_from_slice(&LC_RPATH.to_le_bytes());
    raw.extend_from_slice(&(cmdsize as u32).to_le_bytes());
    raw.extend_from_slice(&12u32.to_le_bytes());
    raw.extend_from_slice(path.as_bytes());
    raw.push(0);
    raw.resize(cmdsize, 0);
    raw
}

fn text_segment_cmd() -> Vec<u8> {
    let cmdsize = 72 + 80;
    let mut raw = Vec::with_capacity(cmdsize);
    raw.extend_from_slice(&LC_SEGMENT_64.to_le_bytes());
    raw.extend_from_slice(&(cmdsize as u32).to_le_bytes());
    raw.extend_from_slice(&name16("__TEXT"));
    raw.extend_from_slice(&0u64.to_le_bytes()); // vmaddr
    raw.extend_from_slice(&0x2000u64.to_le_bytes()); // vmsize
    raw.extend_from_slice(&0u64.to_le_bytes()); // fileoff
    raw.extend_from_slice(&(TEXT_OFFSET as u64 + 16).to_le_bytes()); // filesize
    raw.extend_from_slice(&5i32.to_le_bytes()); // maxprot
    raw.extend_from_slice(&5i32.to_le_bytes()); // initprot
    raw.extend_from_slice(&1u32.to_le_bytes()); // nsects
    raw.extend_from_slice(&0u32.to_le_bytes()); // flags

    raw.extend_from_slice(&name16("__text"));
    raw.extend_from_slice(&name16("__TEXT"));
    raw.extend_from_slice(&(TEXT_OFFSET as u64).to_le_bytes()); // addr
    raw.extend_from_slice(&16u64.to_le_bytes()); // size
    raw.extend_from_slice(&(TEXT_OFFSET as u32).to_le_bytes()); // offset
    raw.extend_from_slice(&4u32.to_le_bytes()); // align
    raw.extend_from_slice(&0u32.to_le_bytes()); // reloff
    raw.extend_from_slice(&0u32.to_le_bytes()); // nreloc
    raw.extend_from_slice(&0u32.to_le_bytes()); // flags
    raw.extend_from_slice(&[0u8; 12]); // reserved1..3
    raw
}

pub struct MachFixture {
    commands: Vec<Vec<u8>>,
}

#[allow(dead_code)]
impl MachFixture {
    pub fn new() -> Self {
        Self {
            commands: vec![text_segment_cmd()],
        }
    }

    pub fn id(mut self, path: &str) -> Self {
        self.commands.push(dylib_cmd(LC_ID_DYLIB, path));
        self
    }

    pub fn load(mut self, path: &str) -> Self {
        self.commands.push(dylib_cmd(LC_LOAD_DYLIB, path));
        self
    }

    pub fn rpath(mut self, path: &str) -> Self {
        self.commands.push(rpath_cmd(path));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let sizeofcmds: usize = self.commands.iter().map(Vec::len).sum();
        let mut out = Vec::with_capacity(TEXT_OFFSET + 16);

        out.extend_from_slice(&MH_MAGIC_64.to_le_bytes());
        out.extend_from_slice(&0x0100_000Cu32.to_le_bytes()); // cputype arm64
        out.extend_from_slice(&0u32.to_le_bytes()); // cpusubtype
        out.extend_from_slice(&2u32.to_le_bytes()); // filetype MH_EXECUTE
        out.extend_from_slice(&(self.commands.len() as u32).to_le_bytes());
        out.extend_from_slice(&(sizeofcmds as u32).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // flags
        out.extend_from_slice(&0u32.to_le_bytes()); // reserved

        for raw in &self.commands {
            out.extend_from_slice(raw);
        }
        out.resize(TEXT_OFFSET, 0);
        out.extend_from_slice(b"fake section dat");
        out
    }
}
