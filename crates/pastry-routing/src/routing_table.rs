//! Pastry prefix routing table
//!
//! Row `r` holds nodes whose digit string shares exactly `r` leading digits
//! with the owner. The column is the value of the candidate's next digit.
//! Each cell keeps at most one node: the one numerically closest to the owner.

use crate::codec::IdentifierCodec;
use crate::error::{PastryError, Result};
use std::fmt;

/// Length of the longest common prefix of two digit strings
pub fn degree_match(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Number of rows needed to address `total_nodes` keys in `radix` digits
///
/// This is `ceil(log_radix(total_nodes))`, computed exactly.
pub fn row_count(total_nodes: usize, radix: u64) -> usize {
    let mut capacity: u128 = 1;
    let mut rows = 0;
    while capacity < total_nodes as u128 {
        capacity *= u128::from(radix);
        rows += 1;
    }
    rows
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    id: String,
    key: u64,
}

/// Routing table owned by a single node
#[derive(Debug, Clone)]
pub struct RoutingTable {
    /// Digit string of the owning node
    owner_id: String,

    /// Numeric key of the owning node
    owner_key: u64,

    rows: usize,
    columns: usize,

    codec: IdentifierCodec,

    /// Single-digit label of each column
    column_values: Vec<String>,

    /// Cells in row-major order
    cells: Vec<Option<Entry>>,
}

impl RoutingTable {
    /// Create an empty table for `owner_id` in a system of `total_nodes`
    pub fn new(total_nodes: usize, owner_id: &str, radix_exponent: u32) -> Result<Self> {
        if total_nodes == 0 {
            return Err(PastryError::Configuration(
                "total node count must be positive".to_string(),
            ));
        }

        let codec = IdentifierCodec::new(radix_exponent)?;
        let owner_key = codec.decode(owner_id)?;

        let columns = codec.radix() as usize;
        let rows = row_count(total_nodes, codec.radix());
        let column_values = (0..codec.radix()).map(|c| codec.encode(c)).collect();

        Ok(RoutingTable {
            owner_id: owner_id.to_string(),
            owner_key,
            rows,
            columns,
            codec,
            column_values,
            cells: vec![None; rows * columns],
        })
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn column_values(&self) -> &[String] {
        &self.column_values
    }

    /// Occupant of a cell, if any
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.cells[row * self.columns + column]
            .as_ref()
            .map(|e| e.id.as_str())
    }

    /// Number of populated cells
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Offer a candidate node to the table
    ///
    /// Candidates that do not fit (prefix too long for the table, or no digit
    /// left after the shared prefix) are ignored. On a collision the occupant
    /// is only replaced by a strictly closer candidate.
    pub fn add_node(&mut self, candidate_id: &str) -> Result<()> {
        let key = self.codec.decode(candidate_id)?;

        let row = degree_match(candidate_id, &self.owner_id);
        if row >= self.rows || row >= candidate_id.len() {
            return Ok(());
        }

        // Decoding succeeded, so the id is ASCII and `row` is a char boundary
        let Some(digit) = candidate_id.get(row..=row) else {
            return Ok(());
        };
        let Some(column) = self.column_values.iter().position(|label| label == digit) else {
            return Ok(());
        };

        let owner_key = self.owner_key;
        let slot = &mut self.cells[row * self.columns + column];
        let replace = match slot {
            Some(occupant) => owner_key.abs_diff(key) < owner_key.abs_diff(occupant.key),
            None => true,
        };
        if replace {
            *slot = Some(Entry {
                id: candidate_id.to_string(),
                key,
            });
        }

        Ok(())
    }

    /// Choose the next hop toward `target_id`
    ///
    /// Returns the owner's own id when the target is the owner, or when no
    /// entry shares a longer prefix with the target than the owner does.
    pub fn get_next_node(&self, target_id: &str) -> &str {
        if target_id == self.owner_id || self.rows == 0 {
            return &self.owner_id;
        }

        let degree = degree_match(target_id, &self.owner_id).min(self.rows - 1);

        if let Some(hit) = self.row(degree).find(|e| e.id == target_id) {
            return &hit.id;
        }

        let deeper = (degree + 1..self.rows).flat_map(|r| self.row(r));
        let best = Self::best_match(deeper, target_id, degree)
            .or_else(|| Self::best_match(self.row(degree), target_id, degree));

        best.map_or(self.owner_id.as_str(), |e| e.id.as_str())
    }

    /// First entry with the strictly longest prefix match above `floor`
    fn best_match<'a>(
        entries: impl Iterator<Item = &'a Entry>,
        target_id: &str,
        floor: usize,
    ) -> Option<&'a Entry> {
        let mut best_degree = floor;
        let mut best = None;
        for entry in entries {
            let degree = degree_match(&entry.id, target_id);
            if degree > best_degree {
                best_degree = degree;
                best = Some(entry);
            }
        }
        best
    }

    /// Populated cells of one row, columns ascending
    fn row(&self, row: usize) -> impl Iterator<Item = &Entry> {
        self.cells[row * self.columns..(row + 1) * self.columns]
            .iter()
            .flatten()
    }
}

impl fmt::Display for RoutingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.column_values.join("\t"))?;
        for row in 0..self.rows {
            let cells: Vec<&str> = (0..self.columns)
                .map(|c| self.cell(row, c).unwrap_or("-"))
                .collect();
            writeln!(f, "{}", cells.join("\t"))?;
        }
        Ok(())
    }
}
