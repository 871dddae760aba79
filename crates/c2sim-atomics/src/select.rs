use core::ops::Range;

use c2sim_core::{ObservationView, Row};

use crate::params::{Qualifier, Team, UnitType};

pub(crate) fn team_rows(obs: &ObservationView<'_>, team: Team) -> Range<usize> {
    match team {
        Team::Foe => obs.foe_rows(),
        Team::Friend => obs.friend_rows(),
    }
}

fn flag_set(flag: f32) -> bool {
    flag > 0.5
}

pub(crate) fn is_unit(row: &Row<'_>, unit: Option<UnitType>) -> bool {
    unit.map_or(true, |u| flag_set(row.type_flag(u.index())))
}

pub(crate) fn self_is_unit(obs: &ObservationView<'_>, unit: UnitType) -> bool {
    flag_set(obs.self_type_flag(unit.index()))
}

/// Alive rows of `team`, optionally restricted to one unit type.
pub(crate) fn alive<'a>(
    obs: &ObservationView<'a>,
    team: Team,
    unit: Option<UnitType>,
) -> impl Iterator<Item = Row<'a>> + 'a {
    obs.rows_in(team_rows(obs, team))
        .filter(move |row| row.is_alive() && is_unit(row, unit))
}

/// Best row under `qualifier`; ties keep the lowest index.
pub(crate) fn pick<'a>(rows: impl Iterator<Item = Row<'a>>, qualifier: Qualifier) -> Option<Row<'a>> {
    let key = |row: &Row<'_>| {
        if qualifier.by_health() {
            row.health()
        } else {
            row.distance()
        }
    };
    rows.fold(None, |best: Option<(Row<'a>, f32)>, row| {
        let k = key(&row);
        match best {
            Some((_, b)) if !better(k, b, qualifier.prefers_min()) => best,
            _ => Some((row, k)),
        }
    })
    .map(|(row, _)| row)
}

fn better(candidate: f32, incumbent: f32, min: bool) -> bool {
    if min {
        candidate < incumbent
    } else {
        candidate > incumbent
    }
}
