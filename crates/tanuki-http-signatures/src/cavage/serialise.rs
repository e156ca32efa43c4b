use super::SignatureHeader;
use std::fmt::Write;

/// Serialise a signature header into its textual `Signature` header form
pub fn serialise<'a, I>(header: SignatureHeader<'_, I, &str>) -> String
where
    I: Iterator<Item = &'a str>,
{
    let mut buffer = String::new();

    let _ = write!(buffer, "keyId=\"{}\"", header.key_id);
    buffer.push_str(",algorithm=\"rsa-sha256\"");

    buffer.push_str(",headers=\"");
    for item in itertools::intersperse(header.headers, " ") {
        buffer.push_str(item);
    }
    buffer.push('"');

    let _ = write!(buffer, ",signature=\"{}\"", header.signature);

    if let Some(created) = header.created {
        let _ = write!(buffer, ",created={created}");
    }

    if let Some(expires) = header.expires {
        let _ = write!(buffer, ",expires={expires}");
    }

    buffer
}

#[cfg(test)]
mod test {
    use super::serialise;
    use crate::cavage::SignatureHeader;

    #[test]
    fn roundtrips_through_parse() {
        let header = SignatureHeader {
            key_id: "https://tanuki.example/users/kou#main-key",
            headers: ["(request-target)", "host", "date", "digest"].into_iter(),
            signature: "c2lnbmF0dXJl",
            created: None,
            expires: None,
        };

        let serialised = serialise(header);
        assert_eq!(
            serialised,
            "keyId=\"https://tanuki.example/users/kou#main-key\",algorithm=\"rsa-sha256\",headers=\"(request-target) host date digest\",signature=\"c2lnbmF0dXJl\""
        );

        let parsed = crate::cavage::parse(&serialised).unwrap();
        assert_eq!(parsed.key_id, "https://tanuki.example/users/kou#main-key");
        assert_eq!(parsed.signature, "c2lnbmF0dXJl");
        assert_eq!(
            parsed.headers.collect::<Vec<_>>(),
            ["(request-target)", "host", "date", "digest"]
        );
    }
}
