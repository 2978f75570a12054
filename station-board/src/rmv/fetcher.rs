//! Fetching a station's board from RMV.

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use tracing::debug;

use crate::domain::{EventKind, StationEvent, VehicleType};
use crate::station::{StationError, StationInfoFetcher};

use super::client::RmvClient;
use super::convert::convert_board;
use super::request::{BoardKind, RtMode, StationBoardRequest};

/// Fetches arrivals and departures of one station from the RMV API.
pub struct RmvStationInfoFetcher {
    client: RmvClient,
    station_id: String,
    ignore_lines: Vec<String>,
    vehicle_type: VehicleType,
    tz: Tz,
}

impl RmvStationInfoFetcher {
    pub fn new(
        client: RmvClient,
        station_id: impl Into<String>,
        ignore_lines: Vec<String>,
        vehicle_type: VehicleType,
        tz: Tz,
    ) -> Self {
        Self {
            client,
            station_id: station_id.into(),
            ignore_lines,
            vehicle_type,
            tz,
        }
    }

    /// The request for this station's board between `start` and `end`.
    pub fn request(&self, kind: BoardKind, start: NaiveDateTime, end: NaiveDateTime) -> StationBoardRequest {
        self.ignore_lines.iter().fold(
            StationBoardRequest::new(kind)
                .ext_id(&self.station_id)
                .rt_mode(RtMode::Realtime)
                .start(start)
                .end(end),
            |request, line| request.exclude_line(line),
        )
    }

    fn fetch_board(
        &self,
        kind: EventKind,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<StationEvent>, StationError> {
        let board_kind = match kind {
            EventKind::Arrival => BoardKind::Arrival,
            EventKind::Departure => BoardKind::Departure,
        };
        let response = self
            .client
            .board(&self.request(board_kind, start, end))
            .map_err(StationError::fetch)?;

        let events = convert_board(&response, kind, self.vehicle_type, self.tz);
        debug!(station = %self.station_id, %kind, count = events.len(), "Fetched RMV board");
        Ok(events)
    }
}

impl StationInfoFetcher for RmvStationInfoFetcher {
    fn fetch_arrivals(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<StationEvent>, StationError> {
        self.fetch_board(EventKind::Arrival, start, end)
    }

    fn fetch_departures(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<StationEvent>, StationError> {
        self.fetch_board(EventKind::Departure, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rmv::RmvConfig;
    use chrono::NaiveDate;
    use chrono_tz::Europe::Berlin;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 10, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn fetcher(base_url: &str, ignore_lines: &[&str]) -> RmvStationInfoFetcher {
        let client = RmvClient::new(RmvConfig::new("secret").with_base_url(base_url).with_timeout(2)).unwrap();
        RmvStationInfoFetcher::new(
            client,
            "3011005",
            ignore_lines.iter().map(|s| s.to_string()).collect(),
            VehicleType::Bus,
            Berlin,
        )
    }

    #[test]
    fn request_for_window() {
        let request = fetcher("http://127.0.0.1:9", &["100", "X40"]).request(BoardKind::Arrival, at(16, 10), at(17, 20));

        assert_eq!(request.kind(), BoardKind::Arrival);
        assert_eq!(
            request.parameters(),
            vec![
                ("extId", "3011005".to_string()),
                ("date", "2019-10-02".to_string()),
                ("time", "16:10".to_string()),
                ("duration", "70".to_string()),
                ("lines", "!100,!X40".to_string()),
                ("rtMode", "REALTIME".to_string()),
            ]
        );
    }

    #[test]
    fn no_ignored_lines_sends_no_filter() {
        let request = fetcher("http://127.0.0.1:9", &[]).request(BoardKind::Departure, at(9, 0), at(10, 0));
        assert!(request.parameters().iter().all(|(k, _)| *k != "lines"));
    }

    #[test]
    fn unreachable_server_is_a_fetch_error() {
        let err = fetcher("http://127.0.0.1:9", &[])
            .fetch_departures(at(9, 0), at(10, 0))
            .unwrap_err();
        assert!(matches!(err, StationError::Fetch(_)));
    }
}
