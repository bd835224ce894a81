use super::NodeKind;

/// Whether a node counts when looking for "significant" siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Significance {
    Significant,
    Insignificant,
}

/// Comments and blank text/CDATA are insignificant; everything else counts.
pub fn classify(kind: NodeKind, text: Option<&str>) -> Significance {
    let blank = text.map_or(true, |t| t.chars().all(char::is_whitespace));
    match kind {
        NodeKind::Comment => Significance::Insignificant,
        NodeKind::Text | NodeKind::CData if blank => Significance::Insignificant,
        _ => Significance::Significant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        use Significance::*;
        assert_eq!(classify(NodeKind::Comment, Some("note")), Insignificant);
        assert_eq!(classify(NodeKind::Text, Some("\n    ")), Insignificant);
        assert_eq!(classify(NodeKind::CData, Some("    ")), Insignificant);
        assert_eq!(classify(NodeKind::CData, Some("")), Insignificant);
        assert_eq!(classify(NodeKind::Text, Some(" x ")), Significant);
        assert_eq!(classify(NodeKind::Element, None), Significant);
        assert_eq!(classify(NodeKind::ProcessingInstruction, Some("")), Significant);
    }
}
