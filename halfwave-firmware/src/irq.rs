//! Interrupt vectors
//!
//! Each vector forwards to the driver installed in its slot. The slots are
//! filled once in `main` before the vectors are unmasked.

use embassy_rp::interrupt;
use embassy_rp::interrupt::InterruptExt;
use portable_atomic::{AtomicU32, Ordering};

use halfwave_core::traits::SerialIrqHandler;
use halfwave_core::InstanceSlot;
use halfwave_drivers::audio::{AudioStreamer, ToneSource};
use halfwave_drivers::serial::{BlockingEngine, DmaEngine, SingleWireTransport};
use halfwave_hal_rp2040::{
    dma, pwm, LinePins, RpDmaChannel, RpPwmSlice, Uart1Control, Uart1Rx, Uart1Tx,
};

/// Audio streamer driven by `PWM_IRQ_WRAP`
pub type Audio = AudioStreamer<ToneSource, RpPwmSlice>;

/// Single-wire transport completing through `UART1_IRQ` and `DMA_IRQ_1`
pub type DmaTransport =
    SingleWireTransport<LinePins, Uart1Control, DmaEngine<RpDmaChannel, RpDmaChannel>>;

/// Single-wire transport that finishes every transfer before returning
pub type BlockingTransport =
    SingleWireTransport<LinePins, Uart1Control, BlockingEngine<Uart1Tx, Uart1Rx>>;

pub static AUDIO: InstanceSlot<Audio> = InstanceSlot::new();
pub static SERIAL: InstanceSlot<DmaTransport> = InstanceSlot::new();

/// Interrupts that found their slot empty or busy
pub static MISSED: AtomicU32 = AtomicU32::new(0);

fn missed(handled: Option<()>) {
    if handled.is_none() {
        MISSED.fetch_add(1, Ordering::Relaxed);
    }
}

/// Unmask the audio vector
pub fn enable_audio() {
    interrupt::PWM_IRQ_WRAP.unpend();
    // SAFETY: the handler only touches AUDIO, which is installed
    unsafe { interrupt::PWM_IRQ_WRAP.enable() };
}

/// Unmask the serial vectors
pub fn enable_serial() {
    interrupt::UART1_IRQ.unpend();
    interrupt::DMA_IRQ_1.unpend();
    // SAFETY: the handlers only touch SERIAL, which is installed
    unsafe {
        interrupt::UART1_IRQ.enable();
        interrupt::DMA_IRQ_1.enable();
    }
}

#[interrupt]
fn PWM_IRQ_WRAP() {
    // One slice drives audio; acknowledge everything so the line drops
    if pwm::take_wrap_flags() != 0 {
        missed(AUDIO.with(|audio| audio.on_wrap()));
    }
}

#[interrupt]
fn UART1_IRQ() {
    missed(SERIAL.with(|serial| serial.on_uart_interrupt()));
}

#[interrupt]
fn DMA_IRQ_1() {
    let mut flags = dma::take_irq1_flags();
    while flags != 0 {
        let channel = flags.trailing_zeros() as u8;
        flags &= flags - 1;
        missed(SERIAL.with(|serial| serial.on_dma_complete(channel)));
    }
}
