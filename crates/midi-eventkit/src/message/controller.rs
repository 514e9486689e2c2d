use serde::{Deserialize, Serialize};

use crate::describe::StringId;
use crate::error::ConfigurationError;
use crate::message::{status, StatusEvent};
use crate::value::{EventData, EventValue, U7};

/// Switch controllers read values at or above this as "on".
pub const TOGGLE_THRESHOLD: u8 = 64;

macro_rules! controller_table {
    (
        values { $($value:ident = $value_number:literal => $value_id:ident,)* }
        toggles { $($toggle:ident = $toggle_number:literal => $toggle_id:ident,)* }
        triggers { $($trigger:ident = $trigger_number:literal => $trigger_id:ident,)* }
    ) => {
        /// Controller identity addressed by a control change message.
        ///
        /// Numbers without an assignment in the MIDI 1.0 table are kept through
        /// [`Controller::Undefined`] so any control change can be represented.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Controller {
            $($value(U7),)*
            $($toggle(bool),)*
            $($trigger,)*
            Undefined { number: UndefinedController, value: U7 },
        }

        impl Controller {
            /// Controller number, 0-119.
            pub const fn number(&self) -> u8 {
                match self {
                    $(Controller::$value(_) => $value_number,)*
                    $(Controller::$toggle(_) => $toggle_number,)*
                    $(Controller::$trigger => $trigger_number,)*
                    Controller::Undefined { number, .. } => number.get(),
                }
            }

            pub const fn value(&self) -> EventValue {
                match self {
                    $(Controller::$value(value) => EventValue::Value(*value),)*
                    $(Controller::$toggle(on) => EventValue::Toggle(*on),)*
                    $(Controller::$trigger => EventValue::None,)*
                    Controller::Undefined { value, .. } => EventValue::Value(*value),
                }
            }

            const fn id(&self) -> StringId {
                match self {
                    $(Controller::$value(_) => StringId::$value_id,)*
                    $(Controller::$toggle(_) => StringId::$toggle_id,)*
                    $(Controller::$trigger => StringId::$trigger_id,)*
                    Controller::Undefined { .. } => StringId::UndefinedController,
                }
            }

            /// Build the identity for `number` carrying `value`.
            ///
            /// Switch controllers treat `value >= 64` as on; data increment and
            /// decrement ignore the value.
            pub fn from_number(number: u8, value: U7) -> Result<Self, ConfigurationError> {
                match number {
                    $($value_number => Ok(Controller::$value(value)),)*
                    $($toggle_number => Ok(Controller::$toggle(value.get() >= TOGGLE_THRESHOLD)),)*
                    $($trigger_number => Ok(Controller::$trigger),)*
                    _ => Ok(Controller::Undefined {
                        number: UndefinedController::new(number)?,
                        value,
                    }),
                }
            }

            /// Whether the MIDI 1.0 table assigns `number` to a named controller.
            pub const fn is_assigned(number: u8) -> bool {
                matches!(
                    number,
                    $($value_number)|* | $($toggle_number)|* | $($trigger_number)|*
                )
            }
        }
    };
}

controller_table! {
    values {
        BankSelect = 0 => BankSelect,
        ModulationWheel = 1 => ModulationWheel,
        BreathController = 2 => BreathController,
        FootController = 4 => FootController,
        PortamentoTime = 5 => PortamentoTime,
        DataEntryMsb = 6 => DataEntryMsb,
        ChannelVolume = 7 => ChannelVolume,
        Balance = 8 => Balance,
        Pan = 10 => Pan,
        ExpressionController = 11 => ExpressionController,
        EffectControl1 = 12 => EffectControl1,
        EffectControl2 = 13 => EffectControl2,
        GeneralPurposeController1 = 16 => GeneralPurposeController1,
        GeneralPurposeController2 = 17 => GeneralPurposeController2,
        GeneralPurposeController3 = 18 => GeneralPurposeController3,
        GeneralPurposeController4 = 19 => GeneralPurposeController4,
        LsbBankSelect = 32 => LsbBankSelect,
        LsbModulationWheel = 33 => LsbModulationWheel,
        LsbBreathController = 34 => LsbBreathController,
        LsbFootController = 36 => LsbFootController,
        LsbPortamentoTime = 37 => LsbPortamentoTime,
        LsbDataEntry = 38 => LsbDataEntry,
        LsbChannelVolume = 39 => LsbChannelVolume,
        LsbBalance = 40 => LsbBalance,
        LsbPan = 42 => LsbPan,
        LsbExpressionController = 43 => LsbExpressionController,
        LsbEffectControl1 = 44 => LsbEffectControl1,
        LsbEffectControl2 = 45 => LsbEffectControl2,
        LsbGeneralPurposeController1 = 48 => LsbGeneralPurposeController1,
        LsbGeneralPurposeController2 = 49 => LsbGeneralPurposeController2,
        LsbGeneralPurposeController3 = 50 => LsbGeneralPurposeController3,
        LsbGeneralPurposeController4 = 51 => LsbGeneralPurposeController4,
        SoundVariation = 70 => SoundVariation,
        TimbreIntensity = 71 => TimbreIntensity,
        ReleaseTime = 72 => ReleaseTime,
        AttackTime = 73 => AttackTime,
        Brightness = 74 => Brightness,
        DecayTime = 75 => DecayTime,
        VibratoRate = 76 => VibratoRate,
        VibratoDepth = 77 => VibratoDepth,
        VibratoDelay = 78 => VibratoDelay,
        SoundController10 = 79 => SoundController10,
        GeneralPurposeController5 = 80 => GeneralPurposeController5,
        GeneralPurposeController6 = 81 => GeneralPurposeController6,
        GeneralPurposeController7 = 82 => GeneralPurposeController7,
        GeneralPurposeController8 = 83 => GeneralPurposeController8,
        PortamentoControl = 84 => PortamentoControl,
        HighResolutionVelocityPrefix = 88 => HighResolutionVelocityPrefix,
        ReverbSendLevel = 91 => ReverbSendLevel,
        TremoloDepth = 92 => TremoloDepth,
        ChorusSendLevel = 93 => ChorusSendLevel,
        CelesteDepth = 94 => CelesteDepth,
        PhaserDepth = 95 => PhaserDepth,
        NonRegisteredParameterLsb = 98 => NonRegisteredParameterLsb,
        NonRegisteredParameterMsb = 99 => NonRegisteredParameterMsb,
        RegisteredParameterLsb = 100 => RegisteredParameterLsb,
        RegisteredParameterMsb = 101 => RegisteredParameterMsb,
    }
    toggles {
        DamperPedal = 64 => DamperPedal,
        PortamentoOnOff = 65 => PortamentoOnOff,
        Sostenuto = 66 => Sostenuto,
        SoftPedal = 67 => SoftPedal,
        LegatoFootswitch = 68 => LegatoFootswitch,
        Hold2 = 69 => Hold2,
    }
    triggers {
        DataIncrement = 96 => DataIncrement,
        DataDecrement = 97 => DataDecrement,
    }
}

impl Controller {
    /// Convenience for [`Controller::Undefined`] from raw numbers.
    pub fn undefined(number: u8, value: u8) -> Result<Self, ConfigurationError> {
        Ok(Controller::Undefined {
            number: UndefinedController::new(number)?,
            value: U7::checked(value, "controller value")?,
        })
    }
}

impl StatusEvent for Controller {
    fn status_byte(&self) -> u8 {
        self.number()
    }

    fn data_bytes(&self) -> EventData {
        EventData::from(self.value())
    }

    fn string_id(&self) -> StringId {
        self.id()
    }

    fn message_len(&self) -> usize {
        2
    }
}

/// A controller number below 120 with no assignment in the MIDI 1.0 table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct UndefinedController(u8);

impl UndefinedController {
    pub fn new(number: u8) -> Result<Self, ConfigurationError> {
        if number >= status::FIRST_CHANNEL_MODE || Controller::is_assigned(number) {
            return Err(ConfigurationError::InvalidControllerNumber(number));
        }
        Ok(Self(number))
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Every undefined controller number in ascending order.
    pub fn all() -> impl Iterator<Item = UndefinedController> {
        (0..status::FIRST_CHANNEL_MODE)
            .filter(|number| !Controller::is_assigned(*number))
            .map(UndefinedController)
    }
}

impl TryFrom<u8> for UndefinedController {
    type Error = ConfigurationError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::new(number)
    }
}

impl From<UndefinedController> for u8 {
    fn from(number: UndefinedController) -> Self {
        number.0
    }
}
