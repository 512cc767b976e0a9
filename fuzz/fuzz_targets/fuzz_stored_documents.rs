// SPDX-License-Identifier: PMPL-1.0-or-later
// Fuzz target for decoding documents read back from the store

#![no_main]

use aclsync_model::{AclDocument, DocKind, Roles, RolesMapping};
use aclsync_store::envelope;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Raw payloads must decode or fail cleanly.
    if let Ok(roles) = Roles::decode(data) {
        // Anything that decodes must survive a write and read back.
        let bytes = roles.encode_for_transport().unwrap();
        assert_eq!(Roles::decode(&bytes).unwrap(), roles);
    }
    let _ = RolesMapping::decode(data);

    // Whole response bodies, envelope included.
    let _ = envelope::unwrap_payload(data, DocKind::Roles);
    let _ = envelope::decode_document::<RolesMapping>(data);
});
