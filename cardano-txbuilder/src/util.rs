use std::time::{Instant, SystemTime, UNIX_EPOCH};

use cardano_codec::{minicbor, utils::Bytes};
use cardano_codec::utils::KeepRaw;
use cardano_traverse::ComputeHash;

/// Wraps a freshly-constructed value in a [`KeepRaw`] by round-tripping it
/// through its own CBOR encoding. `KeepRaw::raw_cbor` requires a buffer that
/// outlives the wrapper, so the encoding is leaked for the life of the
/// process; transactions are built once, not in a hot loop, so this is cheap.
pub fn keep_raw<T>(value: T) -> KeepRaw<'static, T>
where
    T: minicbor::Encode<()> + for<'c> minicbor::Decode<'c, ()>,
{
    let bytes = minicbor::to_vec(&value).expect("well-formed value always encodes");
    let leaked: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    minicbor::decode(leaked).expect("value round-trips through its own encoding")
}

#[inline]
/// If a Vec is empty, returns None, or Some(Vec) if not empty
pub fn opt_if_empty<T>(v: Vec<T>) -> Option<Vec<T>> {
    if v.is_empty() {
        None
    } else {
        Some(v)
    }
}

#[inline]
/// Transforms a hashable type into Bytes
pub fn hash_to_bytes<const N: usize, T: ComputeHash<N>>(input: T) -> Bytes {
    let b = input.compute_hash().as_ref().to_vec();
    b.into()
}

/// Returns UNIX_EPOCH as an instant, may be empty on monotonicity errors
///
/// This is necessary because UNIX_EPOCH is a SystemTime, and there's no simple way to convert
/// between them.
pub fn unix_epoch() -> Option<Instant> {
    // It is necessary to create the instant before the system time to avoid possible errors when
    // the instant is created right before crossing a second boundary.
    let now = Instant::now();

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| now.checked_sub(d))
}
