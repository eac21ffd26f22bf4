use crate::models::{ContentKind, PanelKind};
use crate::render::Template;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelId {
    ExcuseHistory,
    ExcuseFavorites,
    ExcuseRankings,
    ExcuseCalendar,
    ApologyHistory,
    ApologyFavorites,
    ApologyRankings,
    ApologyCalendar,
}

#[derive(Debug)]
pub struct PanelSpec {
    pub id: PanelId,
    pub dom_id: &'static str,
    pub endpoint: &'static str,
    pub content: ContentKind,
    pub kind: PanelKind,
    pub template: Template,
}

pub const PANELS: [PanelSpec; 8] = [
    PanelSpec {
        id: PanelId::ExcuseHistory,
        dom_id: "historyList",
        endpoint: "/api/history",
        content: ContentKind::Excuse,
        kind: PanelKind::History,
        template: Template::History,
    },
    PanelSpec {
        id: PanelId::ExcuseFavorites,
        dom_id: "favoritesList",
        endpoint: "/api/favorites",
        content: ContentKind::Excuse,
        kind: PanelKind::Favorites,
        template: Template::Plain,
    },
    PanelSpec {
        id: PanelId::ExcuseRankings,
        dom_id: "rankingsList",
        endpoint: "/api/rankings",
        content: ContentKind::Excuse,
        kind: PanelKind::Rankings,
        template: Template::Ranked,
    },
    PanelSpec {
        id: PanelId::ExcuseCalendar,
        dom_id: "calendarList",
        endpoint: "/api/calendar",
        content: ContentKind::Excuse,
        kind: PanelKind::Calendar,
        template: Template::Calendar,
    },
    PanelSpec {
        id: PanelId::ApologyHistory,
        dom_id: "apolHistoryList",
        endpoint: "/api/apology-history",
        content: ContentKind::Apology,
        kind: PanelKind::History,
        template: Template::History,
    },
    PanelSpec {
        id: PanelId::ApologyFavorites,
        dom_id: "apolFavList",
        endpoint: "/api/apology-favorites",
        content: ContentKind::Apology,
        kind: PanelKind::Favorites,
        template: Template::Plain,
    },
    PanelSpec {
        id: PanelId::ApologyRankings,
        dom_id: "apolTopList",
        endpoint: "/api/top-apologies",
        content: ContentKind::Apology,
        kind: PanelKind::Rankings,
        template: Template::Ranked,
    },
    PanelSpec {
        id: PanelId::ApologyCalendar,
        dom_id: "apolCalList",
        endpoint: "/api/apology-calendar",
        content: ContentKind::Apology,
        kind: PanelKind::Calendar,
        template: Template::Calendar,
    },
];

impl PanelId {
    pub const ALL: [PanelId; 8] = [
        PanelId::ExcuseHistory,
        PanelId::ExcuseFavorites,
        PanelId::ExcuseRankings,
        PanelId::ExcuseCalendar,
        PanelId::ApologyHistory,
        PanelId::ApologyFavorites,
        PanelId::ApologyRankings,
        PanelId::ApologyCalendar,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static PanelSpec {
        &PANELS[self.index()]
    }

    pub fn from_dom_id(dom_id: &str) -> Option<Self> {
        PANELS.iter().find(|spec| spec.dom_id == dom_id).map(|spec| spec.id)
    }

    pub fn rankings(content: ContentKind) -> Self {
        match content {
            ContentKind::Excuse => Self::ExcuseRankings,
            ContentKind::Apology => Self::ApologyRankings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelPhase {
    Closed,
    Opening,
    Open,
    Closing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Reveal { target: PanelId, closing: Vec<PanelId> },
    Collapse { target: PanelId },
}

impl Transition {
    pub fn target(&self) -> PanelId {
        match self {
            Self::Reveal { target, .. } | Self::Collapse { target } => *target,
        }
    }
}

#[derive(Debug)]
pub struct PanelController {
    phases: [PanelPhase; 8],
    in_flight: bool,
}

impl Default for PanelController {
    fn default() -> Self {
        Self {
            phases: [PanelPhase::Closed; 8],
            in_flight: false,
        }
    }
}

impl PanelController {
    pub fn phase(&self, id: PanelId) -> PanelPhase {
        self.phases[id.index()]
    }

    pub fn open_panel(&self) -> Option<PanelId> {
        PanelId::ALL
            .into_iter()
            .find(|id| self.phase(*id) == PanelPhase::Open)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    // Starts a toggle of `id`. Returns `None` while another transition is
    // still running; the activation is dropped, not queued.
    pub fn begin(&mut self, id: PanelId) -> Option<Transition> {
        if self.in_flight {
            return None;
        }
        self.in_flight = true;

        if self.phase(id) == PanelPhase::Open {
            self.phases[id.index()] = PanelPhase::Closing;
            return Some(Transition::Collapse { target: id });
        }

        let mut closing = Vec::new();
        for other in PanelId::ALL {
            if other != id && self.phase(other) != PanelPhase::Closed {
                self.phases[other.index()] = PanelPhase::Closing;
                closing.push(other);
            }
        }
        self.phases[id.index()] = PanelPhase::Opening;
        Some(Transition::Reveal { target: id, closing })
    }

    pub fn finish(&mut self, transition: &Transition) {
        match transition {
            Transition::Reveal { target, closing } => {
                for id in closing {
                    self.phases[id.index()] = PanelPhase::Closed;
                }
                self.phases[target.index()] = PanelPhase::Open;
            }
            Transition::Collapse { target } => {
                self.phases[target.index()] = PanelPhase::Closed;
            }
        }
        self.in_flight = false;
    }
}
