//! Scenario tests for the ZSLP wallet engine.
//!
//! Builders and the engine facade are driven against recording fakes of the
//! assembly and broadcast ports, and every port call is checked in order.

pub mod helpers;
