/// Optimization sense
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    pub fn as_str(self) -> &'static str {
        match self {
            Sense::Minimize => "minimize",
            Sense::Maximize => "maximize",
        }
    }
}

/// Inclusive integer domain of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub lower: i64,
    pub upper: i64,
}

impl Bounds {
    /// Largest upper bound a variable gets when none is given.
    pub const DEFAULT_UPPER: i64 = i32::MAX as i64;

    pub fn new(lower: i64, upper: i64) -> Self {
        Self { lower, upper }
    }

    /// `[0, i32::MAX]`, the domain of slack variables.
    pub fn non_negative() -> Self {
        Self::new(0, Self::DEFAULT_UPPER)
    }

    pub fn binary() -> Self {
        Self::new(0, 1)
    }

    pub fn contains(self, value: i64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Number of admissible values, saturating.
    pub fn width(self) -> u64 {
        if self.upper < self.lower {
            return 0;
        }
        (self.upper - self.lower).unsigned_abs().saturating_add(1)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::non_negative()
    }
}

/// A named integer decision variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub bounds: Bounds,
}

impl Variable {
    pub fn new(name: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Bounds;

    #[test]
    fn default_bounds_are_non_negative() {
        let bounds = Bounds::default();
        assert_eq!(bounds.lower, 0);
        assert_eq!(bounds.upper, i64::from(i32::MAX));
        assert!(bounds.contains(0));
        assert!(!bounds.contains(-1));
    }

    #[test]
    fn width_counts_values() {
        assert_eq!(Bounds::binary().width(), 2);
        assert_eq!(Bounds::new(0, 6).width(), 7);
        assert_eq!(Bounds::new(3, 2).width(), 0);
    }
}
