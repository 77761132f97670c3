use serde::Deserialize;

#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct PageSize(pub u16);

impl PageSize {
    pub const MAX: PageSize = PageSize(200);

    /// Clamps to `1..=MAX`.
    pub fn clamped(self) -> PageSize {
        PageSize(self.0.clamp(1, Self::MAX.0))
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize(50)
    }
}
