//! WASM guest: integer arithmetic exports.
//!
//! Build with `cargo build -p guest-arith --target wasm32-unknown-unknown --release`
//! and feed the resulting `guest_arith.wasm` path to the runner.
//! Both exports wrap on overflow, matching `i32.add` / `i32.mul`.

#[no_mangle]
pub extern "C" fn add(a: i32, b: i32) -> i32 {
    a.wrapping_add(b)
}

#[no_mangle]
pub extern "C" fn multiple(a: i32, b: i32) -> i32 {
    a.wrapping_mul(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add() {
        assert_eq!(add(6, 27), 33);
        assert_eq!(add(i32::MAX, 1), i32::MIN);
    }

    #[test]
    fn test_multiple() {
        assert_eq!(multiple(6, 27), 162);
        assert_eq!(multiple(-3, 4), -12);
    }
}
