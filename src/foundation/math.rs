/// Round half toward positive infinity (`floor(x + 0.5)`).
///
/// Parameter curves and grid sizing round this way so that `x.5` always moves up, including for
/// negative intermediates before clamping.
pub(crate) fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}
