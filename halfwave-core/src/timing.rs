//! PWM sample clock math
//!
//! The PWM counter runs at `sys_clk / divider` and wraps every
//! `resolution` counts, so one wrap interrupt fires per output sample:
//!
//! ```text
//! sample_rate = sys_clk / (divider * resolution)
//! divider     = sys_clk / (sample_rate * resolution)
//! ```
//!
//! The divider is an 8.4 fixed-point value, so it is computed in sixteenths.
//!
//! The UART baud rate generator is covered here too: it is the other clock
//! divider the drivers program.

use halfwave_hal::ClockDivider;

/// System clock frequency (RP2040 default)
pub const SYS_CLK_HZ: u32 = 125_000_000;

/// Default PWM resolution in bits
pub const DEFAULT_RESOLUTION_BITS: u8 = 10;

/// Number of counts per PWM period for a resolution in bits
pub const fn resolution(bits: u8) -> u32 {
    1u32 << bits
}

/// Counter wrap value for a resolution in bits
pub const fn top(bits: u8) -> u16 {
    (resolution(bits) - 1) as u16
}

/// Level that represents a zero-amplitude sample
pub const fn midpoint(bits: u8) -> u16 {
    (resolution(bits) / 2) as u16
}

/// Calculate the clock divider for a target sample rate
///
/// No range checking is done on `sample_rate`: the result is clamped to the
/// dividers the hardware can express. A zero rate gives the slowest divider.
pub fn pwm_divider(sys_clk_hz: u32, sample_rate: u32, resolution: u32) -> ClockDivider {
    let divisor = sample_rate as u64 * resolution as u64;
    if divisor == 0 {
        return ClockDivider::MAX;
    }

    let divider_x16 = (sys_clk_hz as u64 * 16) / divisor;
    let integer = divider_x16 / 16;
    let fraction = (divider_x16 % 16) as u8;

    if integer == 0 {
        ClockDivider::ONE
    } else if integer > 0xFF {
        ClockDivider::MAX
    } else {
        ClockDivider {
            integer: integer as u8,
            fraction,
        }
    }
}

/// Sample rate actually produced by a divider
pub fn effective_rate(sys_clk_hz: u32, divider: ClockDivider, resolution: u32) -> u32 {
    let denom = divider.to_bits() as u64 * resolution as u64;
    if denom == 0 {
        return 0;
    }
    ((sys_clk_hz as u64 * 16) / denom) as u32
}

/// UART baud rate divisors as `(integer, fraction)`
///
/// The divisor is `clk / (16 * baud)` with a 6-bit fraction, rounded to the
/// nearest 64th. Results are clamped to what the baud rate generator holds.
pub fn uart_divisors(clk_hz: u32, baud: u32) -> (u16, u8) {
    if baud == 0 {
        return (0xFFFF, 0);
    }

    // Divisor in 128ths, so the fraction can be rounded
    let div_x128 = (8 * clk_hz as u64) / baud as u64;
    let integer = div_x128 >> 7;
    let fraction = (((div_x128 & 0x7F) + 1) / 2) as u8;

    if integer == 0 {
        (1, 0)
    } else if integer >= 0xFFFF {
        (0xFFFF, 0)
    } else {
        (integer as u16, fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_resolution_constants() {
        assert_eq!(resolution(10), 1024);
        assert_eq!(top(10), 1023);
        assert_eq!(midpoint(10), 512);
        assert_eq!(midpoint(8), 128);
    }

    #[test]
    fn test_divider_44k() {
        // 125 MHz / (44100 * 1024) = 2.768
        let div = pwm_divider(SYS_CLK_HZ, 44_100, 1024);
        assert_eq!(div.integer, 2);
        assert_eq!(div.fraction, 12);
    }

    #[test]
    fn test_divider_16k() {
        // 125 MHz / (16000 * 1024) = 7.629
        let div = pwm_divider(SYS_CLK_HZ, 16_000, 1024);
        assert_eq!(div.integer, 7);
        assert_eq!(div.fraction, 10);
    }

    #[test]
    fn test_divider_zero_rate() {
        assert_eq!(pwm_divider(SYS_CLK_HZ, 0, 1024), ClockDivider::MAX);
    }

    #[test]
    fn test_divider_clamps() {
        // Too fast for the hardware
        assert_eq!(pwm_divider(SYS_CLK_HZ, 1_000_000, 1024), ClockDivider::ONE);
        // Too slow for the hardware
        assert_eq!(pwm_divider(SYS_CLK_HZ, 10, 1024), ClockDivider::MAX);
    }

    #[test]
    fn test_effective_rate() {
        let div = pwm_divider(SYS_CLK_HZ, 22_050, 1024);
        let rate = effective_rate(SYS_CLK_HZ, div, 1024);
        assert!(rate >= 22_050);
        assert!(rate < 22_050 * 102 / 100);
    }

    #[test]
    fn test_uart_divisors() {
        // 125 MHz / (16 * 1 Mbaud) = 7.8125
        assert_eq!(uart_divisors(SYS_CLK_HZ, 1_000_000), (7, 52));
        // 125 MHz / (16 * 115200) = 67.817
        assert_eq!(uart_divisors(SYS_CLK_HZ, 115_200), (67, 52));
    }

    #[test]
    fn test_uart_divisors_clamp() {
        assert_eq!(uart_divisors(SYS_CLK_HZ, 0), (0xFFFF, 0));
        assert_eq!(uart_divisors(SYS_CLK_HZ, 20_000_000), (1, 0));
        assert_eq!(uart_divisors(SYS_CLK_HZ, 100), (0xFFFF, 0));
    }

    proptest! {
        #[test]
        fn prop_divider_never_overshoots_rate(rate in 500u32..100_000) {
            let div = pwm_divider(SYS_CLK_HZ, rate, 1024);
            let min_rate = SYS_CLK_HZ / (256 * 1024);
            if rate > min_rate && div != ClockDivider::ONE {
                // Truncating the divider can only speed the clock up
                prop_assert!(effective_rate(SYS_CLK_HZ, div, 1024) >= rate);
            }
        }

        #[test]
        fn prop_divider_in_hardware_range(rate in 0u32..2_000_000, bits in 1u8..16) {
            let div = pwm_divider(SYS_CLK_HZ, rate, resolution(bits));
            prop_assert!(div.integer >= 1);
            prop_assert!(div.fraction <= 15);
        }
    }
}
