//! Flag bits for `glob()`/`match_paths()`, mirroring the `GLOB_*` bitfield
//! of POSIX `glob(3)` plus this crate's GNU/extglob/brace/gitignore extensions.
//!
//! A hand-rolled newtype over `u32` with associated bit constants, the
//! same texture as a libc flags table, rather than pulling in a bitflags
//! dependency for eighteen constant bits.

/// A bitfield of [`ZlobFlags`] constants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZlobFlags(pub u32);

impl ZlobFlags {
    pub const NONE: u32 = 0;
    /// Abort on directory-read error; return `Aborted`.
    pub const ERR: u32 = 1 << 0;
    /// Append `/` to each directory pathname.
    pub const MARK: u32 = 1 << 1;
    /// Preserve encounter order instead of sorting.
    pub const NOSORT: u32 = 1 << 2;
    /// Reserve `offs` leading NULL slots in `pathv`/`pathlen`.
    pub const DOOFFS: u32 = 1 << 3;
    /// If zero matches, emit the pattern itself as the sole result.
    pub const NOCHECK: u32 = 1 << 4;
    /// Append to an existing populated result instead of replacing it.
    pub const APPEND: u32 = 1 << 5;
    /// Treat `\` as a literal character in patterns.
    pub const NOESCAPE: u32 = 1 << 6;
    /// Leading `.` in a name is only matched by an explicit `.` in the pattern.
    pub const PERIOD: u32 = 1 << 7;
    /// Output-only: set in the returned flags if the pattern contained magic.
    pub const MAGCHAR: u32 = 1 << 8;
    /// Use `opendir`/`readdir`/`closedir` callbacks from the result buffer.
    pub const ALTDIRFUNC: u32 = 1 << 9;
    /// Enable `{a,b,c}` brace expansion.
    pub const BRACE: u32 = 1 << 10;
    /// Like `NOCHECK`, but only when the pattern has no magic characters.
    pub const NOMAGIC: u32 = 1 << 11;
    /// Enable `~`/`~user` expansion.
    pub const TILDE: u32 = 1 << 12;
    /// Match only directories.
    pub const ONLYDIR: u32 = 1 << 13;
    /// Like `TILDE`, but fail the call if user lookup fails.
    pub const TILDE_CHECK: u32 = 1 << 14;
    /// Enable `**` as a recursive any-components wildcard (otherwise literal).
    pub const RECURSIVE: u32 = 1 << 16;
    /// Enable `@()`/`?()`/`*()`/`+()`/`!()` extended-glob parsing.
    pub const EXTGLOB: u32 = 1 << 17;
    /// Consult the nearest `.gitignore` from CWD upward and prune accordingly.
    pub const GITIGNORE: u32 = 1 << 18;

    #[must_use]
    pub fn new(bits: u32) -> Self {
        ZlobFlags(bits)
    }

    #[must_use]
    pub fn has(self, bit: u32) -> bool {
        self.0 & bit != 0
    }

    #[must_use]
    pub fn with(self, bit: u32) -> Self {
        ZlobFlags(self.0 | bit)
    }

    #[must_use]
    pub fn without(self, bit: u32) -> Self {
        ZlobFlags(self.0 & !bit)
    }
}

impl From<u32> for ZlobFlags {
    fn from(bits: u32) -> Self {
        ZlobFlags(bits)
    }
}
