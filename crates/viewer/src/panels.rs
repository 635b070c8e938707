//! Auxiliary panels and modal dialogs.
//!
//! Panels are shown and hidden by toggling one CSS class; modals are opened by
//! a trigger element. Nothing here is persisted.

/// Class that hides a panel.
pub const PANEL_HIDDEN_CLASS: &str = "d-none";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Panel {
    Analysis,
    Settings,
    Layers,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Analysis, Panel::Settings, Panel::Layers];

    pub const fn trigger_id(self) -> &'static str {
        match self {
            Panel::Analysis => "analysisIcon",
            Panel::Settings => "settingsIcon",
            Panel::Layers => "layerIcon",
        }
    }

    pub const fn element_id(self) -> &'static str {
        match self {
            Panel::Analysis => "analysisControls",
            Panel::Settings => "settingsControls",
            Panel::Layers => "layersControls",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Modal {
    /// Opened by selecting an overlay in the layer list.
    Style,
    GenerateSrtmData,
    ConvertKml,
    ConvertCoordinates,
    Cogo,
    CreatePolygons,
    AddTextWidget,
}

impl Modal {
    pub const ALL: [Modal; 7] = [
        Modal::Style,
        Modal::GenerateSrtmData,
        Modal::ConvertKml,
        Modal::ConvertCoordinates,
        Modal::Cogo,
        Modal::CreatePolygons,
        Modal::AddTextWidget,
    ];

    pub const fn element_id(self) -> &'static str {
        match self {
            Modal::Style => "styleModal",
            Modal::GenerateSrtmData => "generateSrtmDataModal",
            Modal::ConvertKml => "convertKmlModal",
            Modal::ConvertCoordinates => "convertCoordinatesModal",
            Modal::Cogo => "cogoModal",
            Modal::CreatePolygons => "createPolygonsModal",
            Modal::AddTextWidget => "addTextWidgetModal",
        }
    }

    /// Element whose click opens the modal, if it has a dedicated one.
    pub const fn trigger_id(self) -> Option<&'static str> {
        match self {
            Modal::Style => None,
            Modal::GenerateSrtmData => Some("open-generateSrtmDataModal"),
            Modal::ConvertKml => Some("open-convertKmlModal"),
            Modal::ConvertCoordinates => Some("open-convertCoordinatesModal"),
            Modal::Cogo => Some("open-cogoModal"),
            Modal::CreatePolygons => Some("open-createPolygonsModal"),
            Modal::AddTextWidget => Some("addTextWidget"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn element_ids_are_unique() {
        let mut seen = HashSet::new();
        for p in Panel::ALL {
            assert!(seen.insert(p.trigger_id()));
            assert!(seen.insert(p.element_id()));
        }
        for m in Modal::ALL {
            assert!(seen.insert(m.element_id()));
            if let Some(t) = m.trigger_id() {
                assert!(seen.insert(t));
            }
        }
    }

    #[test]
    fn only_style_modal_lacks_a_trigger() {
        let untriggered: Vec<Modal> = Modal::ALL
            .into_iter()
            .filter(|m| m.trigger_id().is_none())
            .collect();
        assert_eq!(untriggered, vec![Modal::Style]);
    }
}
