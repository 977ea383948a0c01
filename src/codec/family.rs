// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::error::Error;

/// The type tag written at the head of every snapshot.
pub(crate) struct Family {
    /// The byte ID for this family.
    pub id: u8,
    /// The name for this family.
    pub name: &'static str,
    /// The minimum preamble size for this family in longs (8-bytes integer).
    pub min_pre_longs: u8,
    /// The maximum preamble size for this family in longs (8-bytes integer).
    pub max_pre_longs: u8,
}

impl Family {
    /// Cuckoo Filter.
    pub const CUCKOO: Family = Family {
        id: 25,
        name: "CUCKOO",
        min_pre_longs: 5,
        max_pre_longs: 6,
    };
}

impl Family {
    pub fn validate_id(&self, family_id: u8) -> Result<(), Error> {
        if family_id != self.id {
            Err(Error::invalid_family(self.id, family_id, self.name))
        } else {
            Ok(())
        }
    }

    pub fn validate_pre_longs(&self, pre_longs: u8) -> Result<(), Error> {
        if pre_longs < self.min_pre_longs || pre_longs > self.max_pre_longs {
            Err(Error::invalid_preamble_longs(self.max_pre_longs, pre_longs))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_validate_id() {
        assert!(Family::CUCKOO.validate_id(25).is_ok());
        let err = Family::CUCKOO.validate_id(24).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FormatMismatch);
    }

    #[test]
    fn test_validate_pre_longs() {
        assert!(Family::CUCKOO.validate_pre_longs(5).is_ok());
        assert!(Family::CUCKOO.validate_pre_longs(6).is_ok());
        assert!(Family::CUCKOO.validate_pre_longs(4).is_err());
        assert!(Family::CUCKOO.validate_pre_longs(7).is_err());
    }
}
