pub mod codec;

pub use codec::{
    concatenate, decode_container, decode_payload, encode_container, CodecError, PcmFormat,
    CONTAINER_HEADER_LEN, PROVIDER_SAMPLE_RATE,
};
