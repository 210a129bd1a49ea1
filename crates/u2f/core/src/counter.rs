//! Signature counter persistence. Stored little-endian, sent big-endian.

use crate::{
    Error, Result,
    constants::{COUNTER_SIZE, object},
    store::{self, Store},
};

pub(crate) fn load<S: Store + ?Sized>(store: &S) -> Result<u32> {
    let bytes = store::read_exact::<S, COUNTER_SIZE>(store, object::COUNTER)?;
    Ok(u32::from_le_bytes(bytes))
}

pub(crate) fn persist<S: Store + ?Sized>(store: &mut S, value: u32) -> Result<()> {
    store.write(object::COUNTER, &value.to_le_bytes())?;
    Ok(())
}

/// Increment and persist the counter, returning the value to sign with.
///
/// The new value is written before it is returned so a value is never used
/// without having been persisted.
pub(crate) fn advance<S: Store + ?Sized>(store: &mut S) -> Result<u32> {
    let next = load(store)?.checked_add(1).ok_or(Error::CounterExhausted)?;
    persist(store, next)?;
    Ok(next)
}
