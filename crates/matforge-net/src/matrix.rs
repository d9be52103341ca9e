//! Square matrices over a prime field.

use std::fmt;

use crate::field::{FieldArithmetic, FieldElement};

/// Errors raised by matrix construction and parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// A token is not a non-negative integer.
    InvalidEntry { line: usize, token: String },
    /// A block does not have as many rows as its first row has entries.
    NotSquare {
        block: usize,
        rows: usize,
        columns: usize,
    },
    /// A row has a different width than the first row of its block.
    RaggedRow {
        line: usize,
        expected: usize,
        actual: usize,
    },
    /// An entry is not an element of the field.
    EntryOutOfRange {
        row: usize,
        column: usize,
        value: FieldElement,
        order: u32,
    },
    /// A write fell outside the matrix.
    IndexOutOfBounds { row: usize, column: usize, size: usize },
}

impl MatrixError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            MatrixError::InvalidEntry { .. } => "MATRIX_INVALID_ENTRY",
            MatrixError::NotSquare { .. } => "MATRIX_NOT_SQUARE",
            MatrixError::RaggedRow { .. } => "MATRIX_RAGGED_ROW",
            MatrixError::EntryOutOfRange { .. } => "MATRIX_ENTRY_OUT_OF_RANGE",
            MatrixError::IndexOutOfBounds { .. } => "MATRIX_INDEX_OUT_OF_BOUNDS",
        }
    }
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::InvalidEntry { line, token } => write!(
                f,
                "[{}] Line {}: '{}' is not a field element",
                self.code(),
                line,
                token
            ),
            MatrixError::NotSquare {
                block,
                rows,
                columns,
            } => write!(
                f,
                "[{}] Matrix {} has {} rows but {} columns",
                self.code(),
                block,
                rows,
                columns
            ),
            MatrixError::RaggedRow {
                line,
                expected,
                actual,
            } => write!(
                f,
                "[{}] Line {}: expected {} entries, found {}",
                self.code(),
                line,
                expected,
                actual
            ),
            MatrixError::EntryOutOfRange {
                row,
                column,
                value,
                order,
            } => write!(
                f,
                "[{}] Entry ({}, {}) = {} is not below the base {}",
                self.code(),
                row,
                column,
                value,
                order
            ),
            MatrixError::IndexOutOfBounds { row, column, size } => write!(
                f,
                "[{}] Index ({}, {}) outside a {}x{} matrix",
                self.code(),
                row,
                column,
                size,
                size
            ),
        }
    }
}

impl std::error::Error for MatrixError {}

/// Row-major square matrix of field elements.
///
/// During construction the matrix is a fixed-size target buffer: step `m`
/// fills column `m - 1` down to the diagonal, so the result is upper
/// triangular.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GfMatrix {
    size: usize,
    entries: Vec<FieldElement>,
}

impl GfMatrix {
    /// An all-zero `size x size` matrix.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            entries: vec![0; size * size],
        }
    }

    pub fn identity(size: usize) -> Self {
        let mut matrix = Self::new(size);
        for i in 0..size {
            matrix.entries[i * size + i] = 1;
        }
        matrix
    }

    /// Build from explicit rows; every row must be as long as there are rows.
    pub fn from_rows(rows: Vec<Vec<FieldElement>>) -> Result<Self, MatrixError> {
        let size = rows.len();
        let mut entries = Vec::with_capacity(size * size);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(MatrixError::RaggedRow {
                    line: index + 1,
                    expected: size,
                    actual: row.len(),
                });
            }
            entries.extend(row);
        }
        Ok(Self { size, entries })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, column: usize) -> Option<FieldElement> {
        if row < self.size && column < self.size {
            Some(self.entries[row * self.size + column])
        } else {
            None
        }
    }

    /// Entry at `(row, column)`, zero outside the matrix.
    pub fn get_or_zero(&self, row: usize, column: usize) -> FieldElement {
        self.get(row, column).unwrap_or(0)
    }

    pub fn set(&mut self, row: usize, column: usize, value: FieldElement) -> Result<(), MatrixError> {
        if row >= self.size || column >= self.size {
            return Err(MatrixError::IndexOutOfBounds {
                row,
                column,
                size: self.size,
            });
        }
        self.entries[row * self.size + column] = value;
        Ok(())
    }

    /// Row `row` as a slice.
    pub fn row(&self, row: usize) -> Option<&[FieldElement]> {
        (row < self.size).then(|| &self.entries[row * self.size..(row + 1) * self.size])
    }

    /// Write the values found at construction step `step` (1-based) into
    /// column `step - 1`, rows `0..step`.
    pub fn commit_step(&mut self, step: usize, column: &[FieldElement]) -> Result<(), MatrixError> {
        if step == 0 || step > self.size || column.len() != step {
            return Err(MatrixError::IndexOutOfBounds {
                row: column.len(),
                column: step.wrapping_sub(1),
                size: self.size,
            });
        }
        for (row, value) in column.iter().enumerate() {
            self.entries[row * self.size + step - 1] = *value;
        }
        Ok(())
    }

    pub fn determinant<F: FieldArithmetic + ?Sized>(&self, field: &F) -> FieldElement {
        self.leading_determinant(field, self.size)
    }

    /// Determinant of the top-left `k x k` block (`k` clamped to the size).
    ///
    /// Gaussian elimination with row swaps; the empty block has determinant 1.
    pub fn leading_determinant<F: FieldArithmetic + ?Sized>(&self, field: &F, k: usize) -> FieldElement {
        let k = k.min(self.size);
        let mut work: Vec<Vec<FieldElement>> = (0..k)
            .map(|row| self.entries[row * self.size..row * self.size + k].to_vec())
            .collect();

        let mut odd_swaps = false;
        for pivot in 0..k {
            let Some(found) = (pivot..k).find(|row| work[*row][pivot] != 0) else {
                return 0;
            };
            if found != pivot {
                work.swap(found, pivot);
                odd_swaps = !odd_swaps;
            }
            let Some(pivot_inv) = field.inv(work[pivot][pivot]) else {
                return 0;
            };
            for row in pivot + 1..k {
                if work[row][pivot] == 0 {
                    continue;
                }
                let factor = field.neg(field.times(pivot_inv, work[row][pivot]));
                for column in pivot..k {
                    let scaled = field.times(factor, work[pivot][column]);
                    work[row][column] = field.plus(work[row][column], scaled);
                }
            }
        }

        let product = (0..k).fold(1, |acc, i| field.times(acc, work[i][i]));
        if odd_swaps {
            field.neg(product)
        } else {
            product
        }
    }

    /// Fail on the first entry that is not below `order`.
    pub fn check_entries(&self, order: u32) -> Result<(), MatrixError> {
        match self.entries.iter().position(|value| *value >= order) {
            Some(index) => Err(MatrixError::EntryOutOfRange {
                row: index / self.size,
                column: index % self.size,
                value: self.entries[index],
                order,
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for GfMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.entries.chunks(self.size.max(1)).take(self.size) {
            let mut first = true;
            for value in row {
                if !first {
                    f.write_str(" ")?;
                }
                write!(f, "{value}")?;
                first = false;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// True when every matrix has the same size (vacuously for none).
pub fn same_size(matrices: &[GfMatrix]) -> bool {
    matrices
        .windows(2)
        .all(|pair| pair[0].size() == pair[1].size())
}

/// Parse blank-line separated square blocks. Lines starting with `#` are
/// skipped.
pub fn parse_matrices(text: &str) -> Result<Vec<GfMatrix>, MatrixError> {
    let mut matrices = Vec::new();
    let mut block: Vec<Vec<FieldElement>> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.starts_with('#') {
            continue;
        }
        if line.is_empty() {
            if !block.is_empty() {
                matrices.push(finish_block(std::mem::take(&mut block), matrices.len())?);
            }
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| {
                token.parse::<FieldElement>().map_err(|_| MatrixError::InvalidEntry {
                    line: line_no,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(first) = block.first().filter(|first| first.len() != row.len()) {
            return Err(MatrixError::RaggedRow {
                line: line_no,
                expected: first.len(),
                actual: row.len(),
            });
        }
        block.push(row);
    }
    if !block.is_empty() {
        matrices.push(finish_block(block, matrices.len())?);
    }

    tracing::debug!(
        component = "matrix",
        operation = "parse",
        status = "success",
        matrices = matrices.len(),
        "Parsed matrices"
    );
    Ok(matrices)
}

fn finish_block(rows: Vec<Vec<FieldElement>>, block: usize) -> Result<GfMatrix, MatrixError> {
    let columns = rows.first().map_or(0, Vec::len);
    if rows.len() != columns {
        return Err(MatrixError::NotSquare {
            block,
            rows: rows.len(),
            columns,
        });
    }
    GfMatrix::from_rows(rows)
}
