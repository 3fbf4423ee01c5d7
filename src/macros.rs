/// Generate one test per variant of an enum, binding the variant to `$v` inside the body
#[macro_export]
macro_rules! test_t {
  ( #[should_panic(expected = $panic_msg:literal)]
    $name:ident[$v:ident: $t:ident = $($variant:ident)|*]() $body:block ) => {$(
      ::paste::paste! {
          #[test]
          #[should_panic(expected = $panic_msg)]
          fn [<test_ $name _ $variant:snake>]() {
            let $v = $t::$variant;
            $body
          }
      }
  )+};
  ($name:ident[$v:ident: $t:ident = $($variant:ident)|*]() $body:block ) => {$(
      ::paste::paste! {
          #[test]
          fn [<test_ $name _ $variant:snake>]() {
            let $v = $t::$variant;
            $body
          }
      }
  )+};
}

#[macro_export]
macro_rules! assert_f64_approx {
    ($l:expr, $r:expr) => {
        assert!(
            ($l - $r).abs() < f64::EPSILON,
            "assertion failed: {} !~ {}",
            $l,
            $r
        )
    };
    ($l:expr, $r:expr, $msg:expr) => {
        assert!(
            ($l - $r).abs() < f64::EPSILON,
            "assertion failed: {} !~ {}: {}",
            $l,
            $r,
            $msg
        )
    };
}
