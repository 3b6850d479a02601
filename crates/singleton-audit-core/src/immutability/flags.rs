use bitflags::bitflags;

bitflags! {
    /// Policy toggles for a single inspection.
    ///
    /// Passed by value into every recursive step; a traversal never changes
    /// the flags it started with.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct InspectionFlags: u8 {
        /// Do not report a type merely because it can be subclassed
        const ALLOW_UNSEALED = 1;
        /// Inspect members even when the type carries an immutability marker
        const IGNORE_IMMUTABILITY_ATTRIBUTE = 1 << 1;
    }
}

impl InspectionFlags {
    pub fn allows_unsealed(self) -> bool {
        self.contains(Self::ALLOW_UNSEALED)
    }

    pub fn honors_immutability_markers(self) -> bool {
        !self.contains(Self::IGNORE_IMMUTABILITY_ATTRIBUTE)
    }
}
