// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Built-in function table for Daichi climate devices.

use super::{FunctionDefinition, ParameterField, ParameterSchema};
use crate::types::{ComfortSleepParams, FunctionId, TargetTemperature};

/// Version of the built-in table.
pub(super) const VERSION: u32 = 1;

fn switch(id: FunctionId, name: &str, command: &str) -> FunctionDefinition {
    FunctionDefinition::boolean(id, name)
        .with_commands(format!("{command}_on"), format!("{command}_off"))
        .linked_to(FunctionId::POWER)
}

fn mode(id: FunctionId, name: &str) -> FunctionDefinition {
    FunctionDefinition::enum_activation(id, name).linked_to(FunctionId::POWER)
}

pub(super) fn definitions() -> Vec<FunctionDefinition> {
    let temp_min = i64::from(TargetTemperature::MIN);
    let temp_max = i64::from(TargetTemperature::MAX);

    vec![
        FunctionDefinition::boolean(FunctionId::POWER, "Power").with_ignore_power_off(),
        FunctionDefinition::integer_range(FunctionId::TEMPERATURE, "Temperature", temp_min, temp_max)
            .linked_to(FunctionId::POWER),
        mode(FunctionId::COOL, "Cool"),
        mode(FunctionId::HEAT, "Heat"),
        mode(FunctionId::AUTO, "Auto"),
        mode(FunctionId::DRY, "Dry"),
        mode(FunctionId::FAN, "Fan"),
        FunctionDefinition::boolean(FunctionId::FAN_SPEED_AUTO, "Fan speed auto")
            .linked_to(FunctionId::POWER),
        FunctionDefinition::integer_range(FunctionId::FAN_SPEED, "Fan speed", 1, 5)
            .linked_to(FunctionId::FAN_SPEED_AUTO),
        switch(FunctionId::VERTICAL_SWING, "Vertical swing", "swingVertical"),
        switch(FunctionId::HORIZONTAL_SWING, "Horizontal swing", "swingHorizontal"),
        switch(FunctionId::SWING_3D, "3D swing", "swing3d"),
        switch(FunctionId::COMFORTABLE_SLEEP, "Comfortable sleep", "comfortSleep")
            .linked_to(FunctionId::TEMPERATURE)
            .with_parameters(ParameterSchema::new(vec![
                ParameterField::integer(ComfortSleepParams::TEMP_KEY, Some(temp_min), Some(temp_max)),
                ParameterField::integer(ComfortSleepParams::SLEEP_TIME_KEY, Some(1), None),
            ])),
        switch(FunctionId::ECO, "Eco", "eco"),
        switch(FunctionId::TURBO, "Turbo", "turbo"),
        switch(FunctionId::SOUND_OFF, "Sound off", "soundOff").with_ignore_power_off(),
        switch(FunctionId::SLEEP, "Sleep", "sleep"),
        switch(FunctionId::HEATING_PLUS_8, "Heating +8", "heating8").with_ignore_power_off(),
    ]
}
