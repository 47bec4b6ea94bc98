//! Seed to enumeration mapping.
//!
//! Mutations that pick "which operation" or "which kind" never construct a
//! discriminant directly. They go through [`enum_from_seed`], which projects
//! an arbitrary seed into the declared `[MIN, MAX]` ordinal range of the
//! enumeration and asserts that the ordinal names a real member.

/// An enumeration whose members have explicit, contiguous ordinals.
///
/// Implemented through the [`seed_enum!`](crate::seed_enum) macro, which
/// derives `MIN`, `MAX` and the ordinal conversions from the declaration.
pub trait SeedEnum: Copy + Sized + 'static {
    /// Name of the enumeration, used in assertion messages.
    const NAME: &'static str;
    /// Smallest declared ordinal.
    const MIN: u32;
    /// Largest declared ordinal.
    const MAX: u32;

    /// Returns the member with the given ordinal, if one is declared.
    fn from_ordinal(ordinal: u32) -> Option<Self>;

    /// Returns the ordinal of this member.
    fn ordinal(self) -> u32;
}

/// Maps `seed` to `MIN + seed mod (MAX - MIN + 1)`.
///
/// # Panics
///
/// Panics if the computed ordinal is not a declared member. That can only
/// happen if an enumeration has gaps in its ordinals, which is a defect in
/// the grammar model and must surface as a crash.
pub fn enum_from_seed<T: SeedEnum>(seed: u32) -> T {
    let span = T::MAX - T::MIN + 1;
    let ordinal = T::MIN + seed % span;
    match T::from_ordinal(ordinal) {
        Some(value) => value,
        None => panic!(
            "{}: ordinal {} in [{}, {}] is not a declared member",
            T::NAME,
            ordinal,
            T::MIN,
            T::MAX
        ),
    }
}

/// Declares a grammar enumeration with explicit ordinals and implements
/// [`SeedEnum`] for it.
///
/// The generated enum derives `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`,
/// `Hash`, `Serialize` and `Deserialize`; extra attributes such as
/// `#[derive(Default)]` are passed through.
#[macro_export]
macro_rules! seed_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant = $value
            ),+
        }

        impl $crate::enum_range::SeedEnum for $name {
            const NAME: &'static str = stringify!($name);
            const MIN: u32 = {
                let mut min = u32::MAX;
                $(
                    if $value < min {
                        min = $value;
                    }
                )+
                min
            };
            const MAX: u32 = {
                let mut max = 0u32;
                $(
                    if $value > max {
                        max = $value;
                    }
                )+
                max
            };

            fn from_ordinal(ordinal: u32) -> Option<Self> {
                $(
                    if ordinal == $value {
                        return Some($name::$variant);
                    }
                )+
                None
            }

            fn ordinal(self) -> u32 {
                self as u32
            }
        }
    };
}
