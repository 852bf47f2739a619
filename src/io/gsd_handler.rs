use crate::prelude::*;
use log::debug;
use num_traits::NumCast;
use rustc_hash::FxHashMap;
use std::{
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
    path::Path,
};
use thiserror::Error;

const GSD_MAGIC: u64 = 0x65DF65DF65DF65DF;
const HEADER_SIZE: usize = 256;
const INDEX_ENTRY_SIZE: usize = 32;
const NAME_SIZE: usize = 64;

/// Element types of gsd chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GsdType {
    U8 = 1,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char,
}

impl GsdType {
    pub fn from_id(id: u8) -> Option<Self> {
        use GsdType::*;
        Some(match id {
            1 => U8,
            2 => U16,
            3 => U32,
            4 => U64,
            5 => I8,
            6 => I16,
            7 => I32,
            8 => I64,
            9 => F32,
            10 => F64,
            11 => Char,
            _ => return None,
        })
    }

    /// Size of one element in bytes
    pub fn size(self) -> usize {
        use GsdType::*;
        match self {
            U8 | I8 | Char => 1,
            U16 | I16 => 2,
            U32 | I32 | F32 => 4,
            U64 | I64 | F64 => 8,
        }
    }
}

/// Index entry of the gsd file: `n` rows of `m` elements
/// stored at `location` for the name with given `id`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GsdChunk {
    pub frame: u64,
    pub n: u64,
    pub m: u32,
    pub location: u64,
    pub id: u16,
    pub data_type: GsdType,
}

impl GsdChunk {
    /// Size of the chunk data in bytes, None if it doesn't fit into u64
    pub fn byte_len(&self) -> Option<u64> {
        self.n
            .checked_mul(self.m as u64)?
            .checked_mul(self.data_type.size() as u64)
    }
}

#[derive(Debug, Error)]
pub enum GsdHandlerError {
    #[error("can't open gsd file for reading")]
    OpenRead(#[source] std::io::Error),

    #[error("reading gsd data")]
    Io(#[from] std::io::Error),

    #[error("not a gsd file (magic {0:#x})")]
    BadMagic(u64),

    #[error("unsupported gsd version {0}.{1}")]
    UnsupportedVersion(u32, u32),

    #[error("unknown element type {1} of chunk {0}")]
    UnknownType(u16, u8),

    #[error("frame {0} is out of range, file has {1} frames")]
    FrameOutOfRange(usize, usize),

    #[error("chunk '{name}' is {n}x{m}, {expected_n}x{expected_m} expected")]
    ChunkShape {
        name: String,
        n: u64,
        m: u32,
        expected_n: usize,
        expected_m: u32,
    },

    #[error("{what} of {size:?} bytes at offset {location} doesn't fit into the file of {file_len} bytes")]
    Truncated {
        what: String,
        location: u64,
        size: Option<u64>,
        file_len: u64,
    },

    #[error("chunk '{0}' holds values not representable as the requested type")]
    BadValue(String),

    #[error("chunk '{0}' of type {1:?} can't hold type names")]
    NotText(String, GsdType),

    #[error("type id {typeid} in '{name}' is out of range, {n_types} types declared")]
    TypeId {
        name: String,
        typeid: usize,
        n_types: usize,
    },
}

/// Reader of the gsd container with the hoomd schema.
///
/// Index and names are read on opening, chunk data is read on request.
/// A chunk absent in the requested frame is taken from frame 0 and
/// then from the defaults of the hoomd schema.
pub struct GsdFileHandler<R = BufReader<File>> {
    reader: R,
    version: (u32, u32),
    name_ids: FxHashMap<String, u16>,
    index: FxHashMap<(u64, u16), GsdChunk>,
    n_frames: usize,
    file_len: u64,
}

impl GsdFileHandler {
    pub fn open(fname: impl AsRef<Path>) -> Result<Self, GsdHandlerError> {
        let f = File::open(fname).map_err(GsdHandlerError::OpenRead)?;
        Self::from_reader(BufReader::new(f))
    }
}

// Buffer for `size` bytes at `location` if they are inside the file
fn buffer_for(
    what: &str,
    location: u64,
    size: Option<u64>,
    file_len: u64,
) -> Result<Vec<u8>, GsdHandlerError> {
    match size.and_then(|sz| Some((sz, location.checked_add(sz)?))) {
        Some((sz, end)) if end <= file_len => Ok(vec![0; sz as usize]),
        _ => Err(GsdHandlerError::Truncated {
            what: what.to_owned(),
            location,
            size,
            file_len,
        }),
    }
}

fn le_u64(b: &[u8], off: usize) -> u64 {
    let mut a = [0; 8];
    a.copy_from_slice(&b[off..off + 8]);
    u64::from_le_bytes(a)
}

fn le_u32(b: &[u8], off: usize) -> u32 {
    let mut a = [0; 4];
    a.copy_from_slice(&b[off..off + 4]);
    u32::from_le_bytes(a)
}

fn le_u16(b: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([b[off], b[off + 1]])
}

// Text up to the first null byte
fn c_str(b: &[u8]) -> String {
    let end = b.iter().position(|&c| c == 0).unwrap_or(b.len());
    String::from_utf8_lossy(&b[..end]).into_owned()
}

impl<R: Read + Seek> GsdFileHandler<R> {
    pub fn from_reader(mut reader: R) -> Result<Self, GsdHandlerError> {
        let mut header = [0; HEADER_SIZE];
        reader.read_exact(&mut header)?;

        let magic = le_u64(&header, 0);
        if magic != GSD_MAGIC {
            return Err(GsdHandlerError::BadMagic(magic));
        }
        let index_location = le_u64(&header, 8);
        let index_entries = le_u64(&header, 16);
        let namelist_location = le_u64(&header, 24);
        let namelist_entries = le_u64(&header, 32);
        let gsd_version = le_u32(&header, 44);
        let version = (gsd_version >> 16, gsd_version & 0xffff);
        if version.0 != 1 && version.0 != 2 {
            return Err(GsdHandlerError::UnsupportedVersion(version.0, version.1));
        }

        let file_len = reader.seek(SeekFrom::End(0))?;

        // Names
        let mut buf = buffer_for(
            "namelist",
            namelist_location,
            namelist_entries.checked_mul(NAME_SIZE as u64),
            file_len,
        )?;
        reader.seek(SeekFrom::Start(namelist_location))?;
        reader.read_exact(&mut buf)?;
        let names: Vec<String> = if version.0 == 1 {
            // Fixed size entries
            buf.chunks_exact(NAME_SIZE)
                .take_while(|e| e[0] != 0)
                .map(c_str)
                .collect()
        } else {
            // Packed null-terminated strings
            buf.split(|&c| c == 0)
                .take_while(|s| !s.is_empty())
                .map(|s| String::from_utf8_lossy(s).into_owned())
                .collect()
        };
        let name_ids = names
            .into_iter()
            .enumerate()
            .map(|(i, s)| (s, i as u16))
            .collect();

        // Index
        let mut buf = buffer_for(
            "index",
            index_location,
            index_entries.checked_mul(INDEX_ENTRY_SIZE as u64),
            file_len,
        )?;
        reader.seek(SeekFrom::Start(index_location))?;
        reader.read_exact(&mut buf)?;
        let mut index = FxHashMap::default();
        let mut n_frames = 0;
        for e in buf.chunks_exact(INDEX_ENTRY_SIZE) {
            let location = le_u64(e, 16);
            // Unused entry
            if location == 0 {
                continue;
            }
            let id = le_u16(e, 28);
            let type_id = e[30];
            let chunk = GsdChunk {
                frame: le_u64(e, 0),
                n: le_u64(e, 8),
                location,
                m: le_u32(e, 24),
                id,
                data_type: GsdType::from_id(type_id)
                    .ok_or_else(|| GsdHandlerError::UnknownType(id, type_id))?,
            };
            n_frames = n_frames.max((chunk.frame as usize).saturating_add(1));
            index.insert((chunk.frame, id), chunk);
        }

        debug!(
            "gsd {}.{}: {} chunks in {} frames",
            version.0,
            version.1,
            index.len(),
            n_frames
        );

        Ok(Self {
            reader,
            version,
            name_ids,
            index,
            n_frames,
            file_len,
        })
    }

    pub fn num_frames(&self) -> usize {
        self.n_frames
    }

    /// Container version as (major, minor)
    pub fn version(&self) -> (u32, u32) {
        self.version
    }

    /// Chunk with given name in the frame, or in frame 0 if absent
    pub fn find_chunk(&self, frame: usize, name: &str) -> Option<GsdChunk> {
        let id = *self.name_ids.get(name)?;
        self.index
            .get(&(frame as u64, id))
            .or_else(|| self.index.get(&(0, id)))
            .copied()
    }

    fn read_bytes(&mut self, chunk: &GsdChunk) -> Result<Vec<u8>, GsdHandlerError> {
        let mut buf = buffer_for(
            &format!("chunk {}", chunk.id),
            chunk.location,
            chunk.byte_len(),
            self.file_len,
        )?;
        self.reader.seek(SeekFrom::Start(chunk.location))?;
        self.reader.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn shaped_chunk(
        &self,
        frame: usize,
        name: &str,
        m: u32,
        n: Option<usize>,
    ) -> Result<Option<GsdChunk>, GsdHandlerError> {
        let Some(c) = self.find_chunk(frame, name) else {
            return Ok(None);
        };
        if c.m != m || n.is_some_and(|n| n as u64 != c.n) {
            return Err(GsdHandlerError::ChunkShape {
                name: name.to_owned(),
                n: c.n,
                m: c.m,
                expected_n: n.unwrap_or(c.n as usize),
                expected_m: m,
            });
        }
        Ok(Some(c))
    }

    /// Values of the chunk with `m` columns converted to `T`.
    /// If `n` is given the chunk must have exactly `n` rows.
    pub fn values<T: NumCast>(
        &mut self,
        frame: usize,
        name: &str,
        m: u32,
        n: Option<usize>,
    ) -> Result<Option<Vec<T>>, GsdHandlerError> {
        let Some(c) = self.shaped_chunk(frame, name, m, n)? else {
            return Ok(None);
        };
        let bytes = self.read_bytes(&c)?;
        decode(&bytes, c.data_type)
            .map(Some)
            .ok_or_else(|| GsdHandlerError::BadValue(name.to_owned()))
    }

    /// Rows of the text chunk, such as the type names
    pub fn strings(
        &mut self,
        frame: usize,
        name: &str,
    ) -> Result<Option<Vec<String>>, GsdHandlerError> {
        let Some(c) = self.find_chunk(frame, name) else {
            return Ok(None);
        };
        if !matches!(c.data_type, GsdType::Char | GsdType::U8 | GsdType::I8) {
            return Err(GsdHandlerError::NotText(name.to_owned(), c.data_type));
        }
        let bytes = self.read_bytes(&c)?;
        if c.m == 0 {
            return Err(GsdHandlerError::ChunkShape {
                name: name.to_owned(),
                n: c.n,
                m: c.m,
                expected_n: c.n as usize,
                expected_m: 1,
            });
        }
        Ok(Some(bytes.chunks_exact(c.m as usize).map(c_str).collect()))
    }

    fn scalar(&mut self, frame: usize, name: &str) -> Result<usize, GsdHandlerError> {
        Ok(self
            .values::<usize>(frame, name, 1, Some(1))?
            .and_then(|v| v.first().copied())
            .unwrap_or(0))
    }

    fn terms<const N: usize>(
        &mut self,
        frame: usize,
        group: &str,
    ) -> Result<Vec<TopologyTerm<N>>, GsdHandlerError> {
        let n = self.scalar(frame, &format!("{group}/N"))?;
        if n == 0 {
            return Ok(vec![]);
        }
        let types = self
            .strings(frame, &format!("{group}/types"))?
            .unwrap_or_default();
        let typeid_name = format!("{group}/typeid");
        let typeid = self
            .values::<usize>(frame, &typeid_name, 1, Some(n))?
            .unwrap_or_else(|| vec![0; n]);
        let group_name = format!("{group}/group");
        let ind = match self.values::<usize>(frame, &group_name, N as u32, Some(n))? {
            Some(v) => v,
            None => vec![0; n.checked_mul(N).ok_or(GsdHandlerError::BadValue(group_name))?],
        };

        typeid
            .iter()
            .zip(ind.chunks_exact(N))
            .map(|(&t, g)| {
                let label = type_name(&types, t, &typeid_name)?;
                let mut ind = [0; N];
                ind.copy_from_slice(g);
                Ok(TopologyTerm::new(label, ind))
            })
            .collect()
    }

    pub fn read(&mut self, frame: usize) -> Result<SystemStorage, GsdHandlerError> {
        if frame >= self.n_frames {
            return Err(GsdHandlerError::FrameOutOfRange(frame, self.n_frames));
        }

        let n = self.scalar(frame, "particles/N")?;
        let mut st = SystemStorage::default();

        if let Some(v) = self.values::<f32>(frame, "configuration/box", 1, Some(6))? {
            let mut b = [0.0; 6];
            b.copy_from_slice(&v);
            st.sim_box = SimBox::from_array(b);
        }

        st.positions = match self.values::<f32>(frame, "particles/position", 3, Some(n))? {
            Some(v) => v
                .chunks_exact(3)
                .map(|c| Pos::new(c[0], c[1], c[2]))
                .collect(),
            None => vec![Pos::origin(); n],
        };

        let types = self
            .strings(frame, "particles/types")?
            .unwrap_or_else(|| vec!["A".to_owned()]);
        st.types = self
            .values::<usize>(frame, "particles/typeid", 1, Some(n))?
            .unwrap_or_else(|| vec![0; n])
            .into_iter()
            .map(|t| type_name(&types, t, "particles/typeid"))
            .collect::<Result<_, _>>()?;

        st.masses = self
            .values(frame, "particles/mass", 1, Some(n))?
            .unwrap_or_else(|| vec![1.0; n]);
        st.charges = self
            .values(frame, "particles/charge", 1, Some(n))?
            .unwrap_or_else(|| vec![0.0; n]);

        st.bonds = self.terms(frame, "bonds")?;
        st.angles = self.terms(frame, "angles")?;
        st.dihedrals = self.terms(frame, "dihedrals")?;
        st.impropers = self.terms(frame, "impropers")?;

        Ok(st)
    }
}

fn type_name(types: &[String], typeid: usize, name: &str) -> Result<String, GsdHandlerError> {
    types
        .get(typeid)
        .cloned()
        .ok_or_else(|| GsdHandlerError::TypeId {
            name: name.to_owned(),
            typeid,
            n_types: types.len(),
        })
}

// Little-endian elements converted to T, None if any value doesn't fit
fn decode<T: NumCast>(bytes: &[u8], t: GsdType) -> Option<Vec<T>> {
    macro_rules! conv {
        ($tp:ty) => {
            bytes
                .chunks_exact(std::mem::size_of::<$tp>())
                .map(|b| {
                    let mut a = [0; std::mem::size_of::<$tp>()];
                    a.copy_from_slice(b);
                    <T as NumCast>::from(<$tp>::from_le_bytes(a))
                })
                .collect()
        };
    }

    match t {
        GsdType::U8 | GsdType::Char => conv!(u8),
        GsdType::U16 => conv!(u16),
        GsdType::U32 => conv!(u32),
        GsdType::U64 => conv!(u64),
        GsdType::I8 => conv!(i8),
        GsdType::I16 => conv!(i16),
        GsdType::I32 => conv!(i32),
        GsdType::I64 => conv!(i64),
        GsdType::F32 => conv!(f32),
        GsdType::F64 => conv!(f64),
    }
}
