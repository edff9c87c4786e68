use crate::model::error::AffinityError;

/// Row indices of the two members of a couple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoupleIndex {
    pub first: usize,
    pub second: usize,
}

impl CoupleIndex {
    pub fn new(first: usize, second: usize) -> Self {
        Self { first, second }
    }

    /// Both members in reporting order, each paired with their partner.
    pub fn sides(&self) -> [(usize, usize); 2] {
        [(self.first, self.second), (self.second, self.first)]
    }
}

impl From<(usize, usize)> for CoupleIndex {
    fn from(value: (usize, usize)) -> Self {
        Self::new(value.0, value.1)
    }
}

pub fn validate_couples(couples: &[CoupleIndex], num_users: usize) -> Result<(), AffinityError> {
    for (position, couple) in couples.iter().enumerate() {
        if couple.first >= num_users || couple.second >= num_users || couple.first == couple.second
        {
            return Err(AffinityError::InvalidCoupleIndex {
                position,
                first: couple.first,
                second: couple.second,
                num_users,
            });
        }
    }
    Ok(())
}
