// Platform abstraction layer for reading host topology.
//
// The topology logic only talks to the `Filesystem` trait, so tests can substitute a mock for the
// sysfs tree of the machine running the tests.

mod filesystem;

pub(crate) use filesystem::*;
