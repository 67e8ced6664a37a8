///
/// Attempts to convert an integer from one type to another, returning `None` if the value does
/// not fit.
///
/// Thin wrapper over [`TryFrom`] that reads better at call sites performing protocol-mandated
/// narrowing, e.g. `checked::cast::<u32, _>(body_len)`.
#[inline]
pub fn cast<To, From>(value: From) -> Option<To>
where
    To: TryFrom<From>,
{
    To::try_from(value).ok()
}

///
/// Integer types supporting overflow-checked addition and multiplication.
///
/// Implemented for all primitive integers, signed and unsigned. Signed overflow is checked in
/// both directions (toward `MIN` as well as `MAX`).
pub trait CheckedArith: Sized + Copy {
    ///
    /// `self + rhs`, or `None` on overflow.
    fn checked_add(self, rhs: Self) -> Option<Self>;

    ///
    /// `self * rhs`, or `None` on overflow.
    fn checked_mul(self, rhs: Self) -> Option<Self>;
}

macro_rules! checked_arith_impl {
    ( $( $int:ty ),* ) => {
        $(
            impl CheckedArith for $int {
                #[inline]
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$int>::checked_add(self, rhs)
                }

                #[inline]
                fn checked_mul(self, rhs: Self) -> Option<Self> {
                    <$int>::checked_mul(self, rhs)
                }
            }
        )*
    };
}

checked_arith_impl!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

///
/// Overflow-checked addition.
#[inline]
pub fn add<T: CheckedArith>(a: T, b: T) -> Option<T> {
    a.checked_add(b)
}

///
/// Overflow-checked multiplication.
#[inline]
pub fn mul<T: CheckedArith>(a: T, b: T) -> Option<T> {
    a.checked_mul(b)
}

#[cfg(test)]
mod tests {
    use crate::checked;

    #[test]
    fn cast_in_range() {
        assert_eq!(checked::cast::<u8, u32>(255), Some(255));
        assert_eq!(checked::cast::<i16, i32>(-32768), Some(-32768));
    }

    #[test]
    fn cast_out_of_range() {
        assert_eq!(checked::cast::<u8, u32>(256), None);
        assert_eq!(checked::cast::<u32, i32>(-1), None);
        assert_eq!(checked::cast::<i8, i32>(128), None);
    }

    #[test]
    fn add_unsigned_overflow() {
        assert_eq!(checked::add(200_u8, 55), Some(255));
        assert_eq!(checked::add(200_u8, 56), None);
    }

    #[test]
    fn add_signed_overflow_both_directions() {
        assert_eq!(checked::add(i32::MAX, 1), None);
        assert_eq!(checked::add(i32::MIN, -1), None);
        assert_eq!(checked::add(i32::MIN, i32::MAX), Some(-1));
    }

    #[test]
    fn mul_overflow() {
        assert_eq!(checked::mul(1_000_000_u32, 1_000), Some(1_000_000_000));
        assert_eq!(checked::mul(1_000_000_u32, 10_000), None);
        assert_eq!(checked::mul(-46341_i32, 46341), None);
    }
}
