pub trait Sort {
    fn name() -> String;

    fn sort<T>(arr: &mut [T])
    where
        T: blipsort::Scalar;
}

pub mod patterns;
