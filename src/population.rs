#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

/// Living head-count of the species, split by sex.
///
/// Counts only ever move through [`Population::record_death`] and
/// [`Population::record_hatch`], which keeps both fields non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Population {
    pub male: u64,
    pub female: u64,
}

impl Population {
    /// Split a starting total by the male probability. The male count is
    /// rounded and the female count derived from the remainder, so the two
    /// always sum to exactly `total`.
    pub fn from_ratio(total: u64, p_male: f64) -> Self {
        let male = ((total as f64) * p_male).round() as u64;
        let male = male.min(total);
        Self {
            male,
            female: total - male,
        }
    }

    pub fn count(&self, sex: Sex) -> u64 {
        match sex {
            Sex::Male => self.male,
            Sex::Female => self.female,
        }
    }

    pub fn record_death(&mut self, sex: Sex) {
        match sex {
            Sex::Male => self.male = self.male.saturating_sub(1),
            Sex::Female => self.female = self.female.saturating_sub(1),
        }
    }

    pub fn record_hatch(&mut self, sex: Sex) {
        match sex {
            Sex::Male => self.male += 1,
            Sex::Female => self.female += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.male + self.female
    }
}
