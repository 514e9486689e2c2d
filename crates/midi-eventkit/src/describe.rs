//! Identifiers describing each message variant, and the localizer seam that
//! turns them into text.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::message::StatusEvent;

macro_rules! string_ids {
    ($($variant:ident => $key:literal, $english:literal;)*) => {
        /// Fixed identifier for every describable message variant.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum StringId {
            $($variant,)*
        }

        impl StringId {
            /// Every identifier, in table order.
            pub const ALL: &'static [StringId] = &[$(StringId::$variant,)*];

            /// Stable lookup key used by localization tables.
            pub const fn key(self) -> &'static str {
                match self {
                    $(StringId::$variant => $key,)*
                }
            }

            /// Built-in English text.
            pub const fn english(self) -> &'static str {
                match self {
                    $(StringId::$variant => $english,)*
                }
            }

            pub fn from_key(key: &str) -> Option<StringId> {
                match key {
                    $($key => Some(StringId::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

string_ids! {
    NoteOff => "midi_noteOff", "Note Off";
    NoteOn => "midi_noteOn", "Note On";
    PolyphonicAftertouch => "midi_polyphonicAftertouch", "Polyphonic Aftertouch";
    ProgramChange => "midi_programChange", "Program Change";
    ChannelAftertouch => "midi_channelAftertouch", "Channel Aftertouch";
    PitchBendChange => "midi_pitchBendChange", "Pitch Bend";

    BankSelect => "midi_bankSelect", "Bank Select";
    ModulationWheel => "midi_modulationWheel", "Modulation Wheel";
    BreathController => "midi_breathController", "Breath Controller";
    FootController => "midi_footController", "Foot Controller";
    PortamentoTime => "midi_portamentoTime", "Portamento Time";
    DataEntryMsb => "midi_dataEntryMSB", "Data Entry MSB";
    ChannelVolume => "midi_channelVolume", "Channel Volume";
    Balance => "midi_balance", "Balance";
    Pan => "midi_pan", "Pan";
    ExpressionController => "midi_expressionController", "Expression";
    EffectControl1 => "midi_effectControl1", "Effect Control 1";
    EffectControl2 => "midi_effectControl2", "Effect Control 2";
    GeneralPurposeController1 => "midi_generalPurposeController1", "General Purpose 1";
    GeneralPurposeController2 => "midi_generalPurposeController2", "General Purpose 2";
    GeneralPurposeController3 => "midi_generalPurposeController3", "General Purpose 3";
    GeneralPurposeController4 => "midi_generalPurposeController4", "General Purpose 4";
    LsbBankSelect => "midi_lsbBankSelect", "Bank Select LSB";
    LsbModulationWheel => "midi_lsbModulationWheel", "Modulation Wheel LSB";
    LsbBreathController => "midi_lsbBreathController", "Breath Controller LSB";
    LsbFootController => "midi_lsbFootController", "Foot Controller LSB";
    LsbPortamentoTime => "midi_lsbPortamentoTime", "Portamento Time LSB";
    LsbDataEntry => "midi_lsbDataEntry", "Data Entry LSB";
    LsbChannelVolume => "midi_lsbChannelVolume", "Channel Volume LSB";
    LsbBalance => "midi_lsbBalance", "Balance LSB";
    LsbPan => "midi_lsbPan", "Pan LSB";
    LsbExpressionController => "midi_lsbExpressionController", "Expression LSB";
    LsbEffectControl1 => "midi_lsbEffectControl1", "Effect Control 1 LSB";
    LsbEffectControl2 => "midi_lsbEffectControl2", "Effect Control 2 LSB";
    LsbGeneralPurposeController1 => "midi_lsbGeneralPurposeController1", "General Purpose 1 LSB";
    LsbGeneralPurposeController2 => "midi_lsbGeneralPurposeController2", "General Purpose 2 LSB";
    LsbGeneralPurposeController3 => "midi_lsbGeneralPurposeController3", "General Purpose 3 LSB";
    LsbGeneralPurposeController4 => "midi_lsbGeneralPurposeController4", "General Purpose 4 LSB";
    DamperPedal => "midi_damperPedal", "Damper Pedal";
    PortamentoOnOff => "midi_portamentoOn", "Portamento On/Off";
    Sostenuto => "midi_sostenutoOn", "Sostenuto";
    SoftPedal => "midi_softPedalOn", "Soft Pedal";
    LegatoFootswitch => "midi_legatoFootswitch", "Legato Footswitch";
    Hold2 => "midi_hold2", "Hold 2";
    SoundVariation => "midi_soundVariation", "Sound Variation";
    TimbreIntensity => "midi_timbreIntensity", "Timbre/Harmonic Intensity";
    ReleaseTime => "midi_releaseTime", "Release Time";
    AttackTime => "midi_attackTime", "Attack Time";
    Brightness => "midi_brightness", "Brightness";
    DecayTime => "midi_decayTime", "Decay Time";
    VibratoRate => "midi_vibratoRate", "Vibrato Rate";
    VibratoDepth => "midi_vibratoDepth", "Vibrato Depth";
    VibratoDelay => "midi_vibratoDelay", "Vibrato Delay";
    SoundController10 => "midi_soundController10", "Sound Controller 10";
    GeneralPurposeController5 => "midi_generalPurposeController5", "General Purpose 5";
    GeneralPurposeController6 => "midi_generalPurposeController6", "General Purpose 6";
    GeneralPurposeController7 => "midi_generalPurposeController7", "General Purpose 7";
    GeneralPurposeController8 => "midi_generalPurposeController8", "General Purpose 8";
    PortamentoControl => "midi_portamentoControl", "Portamento Control";
    HighResolutionVelocityPrefix => "midi_highResolutionVelocityPrefix", "High Resolution Velocity Prefix";
    ReverbSendLevel => "midi_reverbSendLevel", "Reverb Send Level";
    TremoloDepth => "midi_tremoloDepth", "Tremolo Depth";
    ChorusSendLevel => "midi_chorusSendLevel", "Chorus Send Level";
    CelesteDepth => "midi_celesteDepth", "Celeste Depth";
    PhaserDepth => "midi_phaserDepth", "Phaser Depth";
    DataIncrement => "midi_dataIncrement", "Data Increment";
    DataDecrement => "midi_dataDecrement", "Data Decrement";
    NonRegisteredParameterLsb => "midi_nonRegisteredParameterNumberLSB", "NRPN LSB";
    NonRegisteredParameterMsb => "midi_nonRegisteredParameterNumberMSB", "NRPN MSB";
    RegisteredParameterLsb => "midi_registeredParameterNumberLSB", "RPN LSB";
    RegisteredParameterMsb => "midi_registeredParameterNumberMSB", "RPN MSB";
    UndefinedController => "midi_undefinedController", "Undefined Controller";

    AllSoundOff => "midi_allSoundOff", "All Sound Off";
    ResetAllControllers => "midi_resetAllControllers", "Reset All Controllers";
    LocalControl => "midi_localControl", "Local Control";
    AllNotesOff => "midi_allNotesOff", "All Notes Off";
    OmniModeOff => "midi_omniModeOff", "Omni Mode Off";
    OmniModeOn => "midi_omniModeOn", "Omni Mode On";
    MonoModeOn => "midi_monoModeOn", "Mono Mode On";
    PolyModeOn => "midi_polyModeOn", "Poly Mode On";

    SystemExclusive => "midi_systemExclusive", "System Exclusive";
    QuarterFrame => "midi_quarterFrameEvent", "MTC Quarter Frame";
    SongPositionPointer => "midi_songPositionPointer", "Song Position Pointer";
    SongSelect => "midi_songSelect", "Song Select";
    TuneRequest => "midi_tuneRequest", "Tune Request";
    EndOfExclusive => "midi_eox", "End of Exclusive";
    ReservedSystemCommon => "midi_reservedSystemCommon", "Reserved System Common";

    TimingClock => "midi_timingClock", "Timing Clock";
    Start => "midi_start", "Start";
    Continue => "midi_continue", "Continue";
    Stop => "midi_stop", "Stop";
    ActiveSensing => "midi_activeSensing", "Active Sensing";
    Reset => "midi_reset", "System Reset";
    ReservedSystemRealTime => "midi_reservedSystemRealTime", "Reserved System Real Time";
}

/// Identifier describing `event`. Wrappers such as control change report the
/// identity they carry, so the result does not depend on the channel.
pub fn describe<E: StatusEvent + ?Sized>(event: &E) -> StringId {
    event.string_id()
}

/// Resolves identifiers to display text.
pub trait Localizer {
    fn localize(&self, id: StringId) -> Cow<'_, str>;
}

/// Built-in English strings.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnglishLocalizer;

impl Localizer for EnglishLocalizer {
    fn localize(&self, id: StringId) -> Cow<'_, str> {
        Cow::Borrowed(id.english())
    }
}

/// Strings supplied by the caller, keyed by [`StringId::key`]. Missing
/// entries fall back to the key itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableLocalizer {
    entries: HashMap<String, String>,
}

impl TableLocalizer {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Parse a flat JSON object of `key -> text`.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Keys in the table that no identifier uses.
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(|key| StringId::from_key(key).is_none())
    }
}

impl Localizer for TableLocalizer {
    fn localize(&self, id: StringId) -> Cow<'_, str> {
        match self.entries.get(id.key()) {
            Some(text) => Cow::Borrowed(text.as_str()),
            None => Cow::Borrowed(id.key()),
        }
    }
}
