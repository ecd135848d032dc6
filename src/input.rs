use crate::edit::AlleleEdit;
use crate::error::GraphError;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use tracing::warn;

/// Access to named reference sequences.
pub trait ReferenceSource {
    /// Sequence names in the order they should be built.
    fn sequence_names(&self) -> Vec<String>;

    /// The full sequence, or `None` when the name is unknown.
    fn sequence(&self, name: &str) -> Option<&[u8]>;
}

/// Coordinate-sorted elementary allele edits per reference sequence.
pub trait VariantSource {
    /// Edits for `name`, sorted by start. Unknown names have no edits.
    fn edits(&self, name: &str) -> &[AlleleEdit];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaSequence {
    pub id: String,
    pub data: Vec<u8>,
}

pub fn load_sequences(path: &str) -> io::Result<Vec<FastaSequence>> {
    let contents = fs::read_to_string(path)?;
    Ok(parse_fasta(&contents))
}

fn parse_fasta(contents: &str) -> Vec<FastaSequence> {
    let mut sequences = Vec::new();
    let mut id = None;
    let mut data = String::new();
    for line in contents.lines() {
        if let Some(header) = line.strip_prefix('>') {
            if let Some(id_val) = id.take() {
                sequences.push(FastaSequence {
                    id: id_val,
                    data: data.as_bytes().to_vec(),
                });
                data.clear();
            }
            // Only the first word of the header names the sequence
            id = Some(header.split_whitespace().next().unwrap_or("").to_string());
        } else {
            data.push_str(line.trim());
        }
    }
    if let Some(id_val) = id {
        sequences.push(FastaSequence {
            id: id_val,
            data: data.as_bytes().to_vec(),
        });
    }
    sequences
}

/// Reference sequences held in memory, in file order.
#[derive(Debug, Clone, Default)]
pub struct FastaReference {
    sequences: Vec<FastaSequence>,
}

impl FastaReference {
    pub fn new(sequences: Vec<FastaSequence>) -> Self {
        FastaReference { sequences }
    }

    pub fn from_file(path: &str) -> io::Result<Self> {
        Ok(Self::new(load_sequences(path)?))
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

impl ReferenceSource for FastaReference {
    fn sequence_names(&self) -> Vec<String> {
        self.sequences.iter().map(|s| s.id.clone()).collect()
    }

    fn sequence(&self, name: &str) -> Option<&[u8]> {
        self.sequences
            .iter()
            .find(|s| s.id == name)
            .map(|s| s.data.as_slice())
    }
}

/// Edits grouped by reference sequence name.
#[derive(Debug, Clone, Default)]
pub struct EditTable {
    edits: BTreeMap<String, Vec<AlleleEdit>>,
}

impl EditTable {
    pub fn new() -> Self {
        EditTable {
            edits: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, name: &str, edit: AlleleEdit) {
        self.edits.entry(name.to_string()).or_default().push(edit);
    }

    /// Total number of edits over all sequences.
    pub fn len(&self) -> usize {
        self.edits.values().map(|edits| edits.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn from_file(path: &str) -> Result<Self, GraphError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse tab-separated `name start end alt` lines with 0-based,
    /// half-open coordinates. An alt of `.` or `-` (or a missing column)
    /// is a deletion. Blank lines and `#` comments are ignored.
    pub fn parse(contents: &str) -> Result<Self, GraphError> {
        let mut table = EditTable::new();
        for (index, line) in contents.lines().enumerate() {
            let line_number = index + 1;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 3 {
                return Err(GraphError::Parse {
                    line: line_number,
                    message: format!("expected at least 3 fields, found {}", fields.len()),
                });
            }
            let start = parse_coordinate(fields[1], line_number)?;
            let end = parse_coordinate(fields[2], line_number)?;
            let alt = match fields.get(3).map(|alt| alt.trim()) {
                None | Some("") | Some(".") | Some("-") => "",
                Some(alt) => alt,
            };
            if fields.len() > 4 {
                warn!("Line {}: ignoring {} extra fields", line_number, fields.len() - 4);
            }
            table.push(fields[0], AlleleEdit::new(start, end, alt.as_bytes()));
        }
        Ok(table)
    }
}

fn parse_coordinate(field: &str, line: usize) -> Result<usize, GraphError> {
    field.trim().parse::<usize>().map_err(|_| GraphError::Parse {
        line,
        message: format!("invalid coordinate: {}", field),
    })
}

impl VariantSource for EditTable {
    fn edits(&self, name: &str) -> &[AlleleEdit] {
        self.edits.get(name).map(|edits| edits.as_slice()).unwrap_or(&[])
    }
}
