//! Program descriptions: header values plus one generator per line.
//!
//! ```text
//! s=2
//! p=2
//! m=16
//! net 0 1
//! weak 5 from 3 to 10 net u2 0 1
//! propA' 0 1
//! ```
//!
//! A generator line reads `[weak <weight>] [from <min> [to <max>]] <name>
//! <options..> <dims..>`. Everything after `#` is a comment.

use std::collections::BTreeMap;
use std::fmt;

use matforge_expr::{SparseStorage, Storage};

use crate::field::{FieldError, GaloisField};
use crate::generators::{
    Generator, Modifier, NetGenerator, PropAGenerator, PropAPrimeGenerator, StratifiedGenerator,
};

/// Errors raised while reading or validating a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
    /// Header value missing, non-numeric or out of range.
    InvalidHeader { key: char, value: String },
    DuplicateHeader { line: usize, key: char },
    /// Header never given and not overridden.
    MissingHeader { key: char },
    UnknownGenerator { line: usize, name: String },
    /// Modifiers with no generator name after them.
    MissingGenerator { line: usize },
    InvalidNumber { line: usize, token: String },
    MissingDimensions { line: usize, generator: String },
    UnknownOption { generator: String, option: String },
    DimensionOutOfRange {
        generator: String,
        dimension: usize,
        dimensions: usize,
    },
    Field(FieldError),
}

impl ProgramError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ProgramError::InvalidHeader { .. } => "PROGRAM_INVALID_HEADER",
            ProgramError::DuplicateHeader { .. } => "PROGRAM_DUPLICATE_HEADER",
            ProgramError::MissingHeader { .. } => "PROGRAM_MISSING_HEADER",
            ProgramError::UnknownGenerator { .. } => "PROGRAM_UNKNOWN_GENERATOR",
            ProgramError::MissingGenerator { .. } => "PROGRAM_MISSING_GENERATOR",
            ProgramError::InvalidNumber { .. } => "PROGRAM_INVALID_NUMBER",
            ProgramError::MissingDimensions { .. } => "PROGRAM_MISSING_DIMENSIONS",
            ProgramError::UnknownOption { .. } => "PROGRAM_UNKNOWN_OPTION",
            ProgramError::DimensionOutOfRange { .. } => "PROGRAM_DIMENSION_OUT_OF_RANGE",
            ProgramError::Field(err) => err.code(),
        }
    }
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::InvalidHeader { key, value } => {
                write!(f, "[{}] Cannot use '{}' as value of {}", self.code(), value, key)
            }
            ProgramError::DuplicateHeader { line, key } => {
                write!(f, "[{}] Line {}: {} is already set", self.code(), line, key)
            }
            ProgramError::MissingHeader { key } => {
                write!(f, "[{}] Program does not set {}", self.code(), key)
            }
            ProgramError::UnknownGenerator { line, name } => write!(
                f,
                "[{}] Line {}: '{}' is not a known constraint",
                self.code(),
                line,
                name
            ),
            ProgramError::MissingGenerator { line } => {
                write!(f, "[{}] Line {}: no constraint name", self.code(), line)
            }
            ProgramError::InvalidNumber { line, token } => write!(
                f,
                "[{}] Line {}: '{}' is not a number",
                self.code(),
                line,
                token
            ),
            ProgramError::MissingDimensions { line, generator } => write!(
                f,
                "[{}] Line {}: no dimension for the constraint {}",
                self.code(),
                line,
                generator
            ),
            ProgramError::UnknownOption { generator, option } => write!(
                f,
                "[{}] Constraint {} does not understand option '{}'",
                self.code(),
                generator,
                option
            ),
            ProgramError::DimensionOutOfRange {
                generator,
                dimension,
                dimensions,
            } => write!(
                f,
                "[{}] Constraint {} uses dimension {} but s = {}",
                self.code(),
                generator,
                dimension,
                dimensions
            ),
            ProgramError::Field(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ProgramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProgramError::Field(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FieldError> for ProgramError {
    fn from(err: FieldError) -> Self {
        ProgramError::Field(err)
    }
}

/// Builds a generator from a parsed line.
pub type GeneratorFactory<S> =
    fn(Modifier, Vec<usize>, &[String]) -> Result<Box<dyn Generator<S>>, ProgramError>;

/// Generator names known to the parser.
pub struct Registry<S: Storage = SparseStorage> {
    factories: BTreeMap<String, GeneratorFactory<S>>,
}

impl<S: Storage + 'static> Registry<S> {
    /// A registry without any generator.
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// `net`, `stratified`, `propA` and `propA'`.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("net", build_net::<S>);
        registry.register("stratified", build_stratified::<S>);
        registry.register("propA", build_prop_a::<S>);
        registry.register("propA'", build_prop_a_prime::<S>);
        registry
    }

    /// Add or replace a generator name.
    pub fn register(&mut self, name: impl Into<String>, factory: GeneratorFactory<S>) {
        self.factories.insert(name.into(), factory);
    }

    pub fn get(&self, name: &str) -> Option<GeneratorFactory<S>> {
        self.factories.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl<S: Storage + 'static> Default for Registry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Storage> fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}

fn reject_options(generator: &str, options: &[String]) -> Result<(), ProgramError> {
    match options.first() {
        Some(option) => Err(ProgramError::UnknownOption {
            generator: generator.to_string(),
            option: option.clone(),
        }),
        None => Ok(()),
    }
}

fn build_net<S: Storage>(
    modifier: Modifier,
    dims: Vec<usize>,
    options: &[String],
) -> Result<Box<dyn Generator<S>>, ProgramError> {
    let mut generator = NetGenerator::new(modifier, dims);
    for option in options {
        let cap = option
            .strip_prefix('u')
            .filter(|digits| is_unsigned(digits))
            .and_then(|digits| digits.parse().ok())
            .ok_or_else(|| ProgramError::UnknownOption {
                generator: "net".to_string(),
                option: option.clone(),
            })?;
        generator = generator.with_max_unbalance(cap);
    }
    Ok(Box::new(generator))
}

fn build_stratified<S: Storage>(
    modifier: Modifier,
    dims: Vec<usize>,
    options: &[String],
) -> Result<Box<dyn Generator<S>>, ProgramError> {
    reject_options("stratified", options)?;
    Ok(Box::new(StratifiedGenerator::new(modifier, dims)))
}

fn build_prop_a<S: Storage>(
    modifier: Modifier,
    dims: Vec<usize>,
    options: &[String],
) -> Result<Box<dyn Generator<S>>, ProgramError> {
    reject_options("propA", options)?;
    Ok(Box::new(PropAGenerator::new(modifier, dims)))
}

fn build_prop_a_prime<S: Storage>(
    modifier: Modifier,
    dims: Vec<usize>,
    options: &[String],
) -> Result<Box<dyn Generator<S>>, ProgramError> {
    reject_options("propA'", options)?;
    Ok(Box::new(PropAPrimeGenerator::new(modifier, dims)))
}

fn is_unsigned(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|byte| byte.is_ascii_digit())
}

/// A parsed program: sizes, field order and generators.
#[derive(Debug)]
pub struct Program<S: Storage = SparseStorage> {
    dimensions: Option<usize>,
    base: Option<u32>,
    target_rows: Option<usize>,
    generators: Vec<Box<dyn Generator<S>>>,
    lines: Vec<String>,
}

impl<S: Storage + 'static> Program<S> {
    /// A program with no header and no generator.
    pub fn new() -> Self {
        Self {
            dimensions: None,
            base: None,
            target_rows: None,
            generators: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Parse `text` against `registry`. Header values are checked here;
    /// cross-checks wait for [`Program::validate`].
    pub fn parse(text: &str, registry: &Registry<S>) -> Result<Self, ProgramError> {
        let mut program = Self::new();
        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            if let Some((key, value)) = header(line) {
                program.set_header(line_no, key, value)?;
                continue;
            }
            let generator = parse_generator(line_no, line, registry)?;
            program.generators.push(generator);
            program.lines.push(line.to_string());
        }

        tracing::debug!(
            component = "program",
            operation = "parse",
            status = "success",
            generators = program.generators.len(),
            "Parsed program"
        );
        Ok(program)
    }

    fn set_header(&mut self, line: usize, key: char, value: &str) -> Result<(), ProgramError> {
        let invalid = || ProgramError::InvalidHeader {
            key,
            value: value.to_string(),
        };
        let number: u64 = value.parse().map_err(|_| invalid())?;
        let duplicate = match key {
            's' => self.dimensions.replace(number as usize).is_some(),
            'p' => self
                .base
                .replace(u32::try_from(number).map_err(|_| invalid())?)
                .is_some(),
            _ => self.target_rows.replace(number as usize).is_some(),
        };
        if duplicate {
            return Err(ProgramError::DuplicateHeader { line, key });
        }
        self.check_headers()
    }

    fn check_headers(&self) -> Result<(), ProgramError> {
        let checks = [
            ('s', self.dimensions.map(|s| s as u64), 1),
            ('p', self.base.map(u64::from), 2),
            ('m', self.target_rows.map(|m| m as u64), 1),
        ];
        for (key, value, min) in checks {
            if let Some(value) = value.filter(|value| *value < min) {
                return Err(ProgramError::InvalidHeader {
                    key,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn with_base(mut self, base: u32) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_target_rows(mut self, rows: usize) -> Self {
        self.target_rows = Some(rows);
        self
    }

    /// Append a generator built in code; `line` is how it prints.
    pub fn with_generator(mut self, line: impl Into<String>, generator: Box<dyn Generator<S>>) -> Self {
        self.generators.push(generator);
        self.lines.push(line.into());
        self
    }

    /// `s`, 0 while unset.
    pub fn dimensions(&self) -> usize {
        self.dimensions.unwrap_or(0)
    }

    /// `p`, 0 while unset.
    pub fn base(&self) -> u32 {
        self.base.unwrap_or(0)
    }

    /// `m`, 0 while unset.
    pub fn target_rows(&self) -> usize {
        self.target_rows.unwrap_or(0)
    }

    pub fn generators(&self) -> &[Box<dyn Generator<S>>] {
        &self.generators
    }

    /// Check sizes and dimensions and build the field.
    pub fn validate(&self) -> Result<GaloisField, ProgramError> {
        let dimensions = self.dimensions.ok_or(ProgramError::MissingHeader { key: 's' })?;
        let base = self.base.ok_or(ProgramError::MissingHeader { key: 'p' })?;
        self.target_rows
            .ok_or(ProgramError::MissingHeader { key: 'm' })?;
        self.check_headers()?;

        for generator in &self.generators {
            if let Some(dimension) = generator.dims().iter().find(|dim| **dim >= dimensions) {
                return Err(ProgramError::DimensionOutOfRange {
                    generator: generator.name().to_string(),
                    dimension: *dimension,
                    dimensions,
                });
            }
        }
        Ok(GaloisField::new(base)?)
    }
}

impl<S: Storage + 'static> Default for Program<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints the program back in its own language, overrides applied.
impl<S: Storage> fmt::Display for Program<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(s) = self.dimensions {
            writeln!(f, "s={s}")?;
        }
        if let Some(p) = self.base {
            writeln!(f, "p={p}")?;
        }
        if let Some(m) = self.target_rows {
            writeln!(f, "m={m}")?;
        }
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn header(line: &str) -> Option<(char, &str)> {
    let (key, value) = line.split_once('=')?;
    match key.trim() {
        "s" => Some(('s', value.trim())),
        "p" => Some(('p', value.trim())),
        "m" => Some(('m', value.trim())),
        _ => None,
    }
}

fn parse_generator<S: Storage + 'static>(
    line_no: usize,
    line: &str,
    registry: &Registry<S>,
) -> Result<Box<dyn Generator<S>>, ProgramError> {
    let mut tokens = line.split_whitespace().peekable();
    let number = |token: Option<&str>| -> Result<i64, ProgramError> {
        let token = token.unwrap_or("");
        token.parse().map_err(|_| ProgramError::InvalidNumber {
            line: line_no,
            token: token.to_string(),
        })
    };
    let count = |token: Option<&str>| -> Result<usize, ProgramError> {
        let value = number(token)?;
        usize::try_from(value).map_err(|_| ProgramError::InvalidNumber {
            line: line_no,
            token: value.to_string(),
        })
    };

    let mut modifier = Modifier::new();
    if tokens.next_if_eq(&"weak").is_some() {
        modifier = modifier.with_weak(number(tokens.next())?);
    }
    if tokens.next_if_eq(&"from").is_some() {
        modifier.min_rows = count(tokens.next())?;
        if tokens.next_if_eq(&"to").is_some() {
            modifier.max_rows = count(tokens.next())?;
        }
    }

    let name = tokens
        .next()
        .ok_or(ProgramError::MissingGenerator { line: line_no })?;
    let factory = registry
        .get(name)
        .ok_or_else(|| ProgramError::UnknownGenerator {
            line: line_no,
            name: name.to_string(),
        })?;

    let mut options = Vec::new();
    while let Some(option) = tokens.next_if(|token| !is_unsigned(token)) {
        options.push(option.to_string());
    }
    let dims = tokens
        .map(|token| count(Some(token)))
        .collect::<Result<Vec<_>, _>>()?;
    if dims.is_empty() {
        return Err(ProgramError::MissingDimensions {
            line: line_no,
            generator: name.to_string(),
        });
    }
    factory(modifier, dims, &options)
}
