/// An extension trait for floating point types to convert between linear gain and decibels.
///
/// Spectral magnitudes in this workspace are linear; the dB forms show up at the edges, e.g. when reporting how flat
/// an equalized average is.
pub trait DbExt {
    fn db_to_gain(self) -> Self;
    fn gain_to_db(self) -> Self;
}

macro_rules! db_impl {
    ($t:ty) => {
        impl DbExt for $t {
            fn db_to_gain(self) -> Self {
                (10.0f64 as $t).powf(self / 20.0)
            }

            fn gain_to_db(self) -> Self {
                20.0 * self.log10()
            }
        }
    };
}

db_impl!(f32);
db_impl!(f64);
