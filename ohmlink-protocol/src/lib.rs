//! Ohmlink Telemetry Protocol
//!
//! This crate defines the line protocol between the measuring host and the
//! display node, plus the colour-band vocabulary both ends share. Keeping the
//! encoder and decoder in one crate means a field-order or vocabulary change
//! is a single edit, checked by the tests below on both sides.
//!
//! # Protocol Overview
//!
//! Every reading travels as one line of ASCII text:
//! ```text
//! R:<ohms>,<digit-1>,<digit-2>,<multiplier>,<tolerance>\n
//! R:4700.0,yellow,violet,red,gold\n
//! ```
//!
//! There is no length prefix and no checksum. The transport is a reliable,
//! in-order byte stream; anything that fails to decode is dropped by the
//! receiver.

#![no_std]
#![deny(unsafe_code)]

pub mod band;
pub mod codec;
pub mod color_code;
pub mod reading;

pub use band::Band;
pub use codec::{decode, encode, DecodeError, EncodeError, Line, MAX_ABS_VALUE, MAX_LINE_LEN};
pub use reading::Reading;
