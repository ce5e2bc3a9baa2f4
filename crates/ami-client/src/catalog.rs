//! Constructors for the named manager actions.
//!
//! Each constructor only assembles parameters; sending happens through
//! [`crate::Connection::send_action`] or the matching convenience method on
//! [`crate::Connection`]. Optional string arguments that are empty are
//! treated as absent.

use crate::action::Action;

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

fn with_action_id(action: Action, action_id: Option<&str>) -> Action {
    action.param_opt("ActionID", present(action_id))
}

fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Optional parameters of the `Originate` action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Originate {
    /// Extension to dial (requires `context` and `priority`).
    pub exten: Option<String>,
    /// Dialplan context (requires `exten` and `priority`).
    pub context: Option<String>,
    /// Dialplan priority (requires `exten` and `context`).
    pub priority: Option<String>,
    /// Application to run instead of a dialplan location.
    pub application: Option<String>,
    /// Application data (requires `application`).
    pub data: Option<String>,
    /// Milliseconds to wait for the call to be answered.
    pub timeout: Option<u64>,
    /// Caller ID for the outgoing channel.
    pub caller_id: Option<String>,
    /// Channel variables, `VAR1=value1|VAR2=value2`.
    pub variable: Option<String>,
    /// Account code.
    pub account: Option<String>,
    /// Originate asynchronously.
    pub is_async: Option<bool>,
    /// Caller-chosen correlation token echoed by the manager.
    pub action_id: Option<String>,
}

impl Action {
    /// `Login` with the given credentials.
    #[must_use]
    pub fn login(username: &str, secret: &str) -> Self {
        Self::new("Login")
            .param("Username", username)
            .param("Secret", secret)
    }

    /// `Logoff`.
    #[must_use]
    pub fn logoff() -> Self {
        Self::new("Logoff")
    }

    /// `AbsoluteTimeout`: hang a channel up after `timeout` seconds.
    #[must_use]
    pub fn absolute_timeout(channel: &str, timeout: impl std::fmt::Display) -> Self {
        Self::new("AbsoluteTimeout")
            .param("Channel", channel)
            .param("Timeout", timeout)
    }

    /// `ChangeMonitor`: rename the monitor file of a channel.
    #[must_use]
    pub fn change_monitor(channel: &str, file: &str) -> Self {
        Self::new("ChangeMonitor")
            .param("Channel", channel)
            .param("File", file)
    }

    /// `Command`: run a CLI command; the output arrives as a `Follows` payload.
    #[must_use]
    pub fn command(command: &str, action_id: Option<&str>) -> Self {
        with_action_id(Self::new("Command").param("Command", command), action_id)
    }

    /// `Events`: set the event mask (`on`, `off`, or a class list).
    #[must_use]
    pub fn events(event_mask: &str) -> Self {
        Self::new("Events").param("EventMask", event_mask)
    }

    /// `ExtensionState`.
    #[must_use]
    pub fn extension_state(exten: &str, context: &str, action_id: Option<&str>) -> Self {
        with_action_id(
            Self::new("ExtensionState")
                .param("Exten", exten)
                .param("Context", context),
            action_id,
        )
    }

    /// `GetVar`: read a channel variable.
    #[must_use]
    pub fn get_var(channel: &str, variable: &str, action_id: Option<&str>) -> Self {
        with_action_id(
            Self::new("GetVar")
                .param("Channel", channel)
                .param("Variable", variable),
            action_id,
        )
    }

    /// `Hangup`.
    #[must_use]
    pub fn hangup(channel: &str) -> Self {
        Self::new("Hangup").param("Channel", channel)
    }

    /// `IAXPeers`.
    #[must_use]
    pub fn iax_peers() -> Self {
        Self::new("IAXPeers")
    }

    /// `ListCommands`.
    #[must_use]
    pub fn list_commands(action_id: Option<&str>) -> Self {
        with_action_id(Self::new("ListCommands"), action_id)
    }

    /// `MailboxCount`: new and old message counts for `mailbox@context`.
    #[must_use]
    pub fn mailbox_count(mailbox: &str, action_id: Option<&str>) -> Self {
        with_action_id(Self::new("MailboxCount").param("Mailbox", mailbox), action_id)
    }

    /// `MailboxStatus`: waiting message count for `mailbox@context`.
    #[must_use]
    pub fn mailbox_status(mailbox: &str, action_id: Option<&str>) -> Self {
        with_action_id(Self::new("MailboxStatus").param("Mailbox", mailbox), action_id)
    }

    /// `Monitor`: start recording a channel.
    ///
    /// `Mix` is only sent when a file name is given.
    #[must_use]
    pub fn monitor(
        channel: &str,
        file: Option<&str>,
        format: Option<&str>,
        mix: Option<bool>,
    ) -> Self {
        let action = Self::new("Monitor")
            .param("Channel", channel)
            .param_opt("File", present(file))
            .param_opt("Format", present(format));
        match file {
            Some(_) => action.param("Mix", flag(mix.unwrap_or(false))),
            None => action,
        }
    }

    /// `Originate`: place a call from `channel`.
    #[must_use]
    pub fn originate(channel: &str, options: &Originate) -> Self {
        Self::new("Originate")
            .param("Channel", channel)
            .param_opt("Exten", options.exten.as_deref())
            .param_opt("Context", options.context.as_deref())
            .param_opt("Priority", options.priority.as_deref())
            .param_opt("Application", options.application.as_deref())
            .param_opt("Data", options.data.as_deref())
            .param_opt("Timeout", options.timeout)
            .param_opt("CallerID", options.caller_id.as_deref())
            .param_opt("Variable", options.variable.as_deref())
            .param_opt("Account", options.account.as_deref())
            .param_opt("Async", options.is_async.map(flag))
            .param_opt("ActionID", options.action_id.as_deref())
    }

    /// `ParkedCalls`.
    #[must_use]
    pub fn parked_calls(action_id: Option<&str>) -> Self {
        with_action_id(Self::new("ParkedCalls"), action_id)
    }

    /// `Ping`.
    #[must_use]
    pub fn ping() -> Self {
        Self::new("Ping")
    }

    /// `QueueAdd`: add an interface to a queue. A zero penalty is not sent.
    #[must_use]
    pub fn queue_add(queue: &str, interface: &str, penalty: u32) -> Self {
        let action = Self::new("QueueAdd")
            .param("Queue", queue)
            .param("Interface", interface);
        if penalty == 0 {
            action
        } else {
            action.param("Penalty", penalty)
        }
    }

    /// `QueueRemove`.
    #[must_use]
    pub fn queue_remove(queue: &str, interface: &str) -> Self {
        Self::new("QueueRemove")
            .param("Queue", queue)
            .param("Interface", interface)
    }

    /// `Queues`.
    #[must_use]
    pub fn queues() -> Self {
        Self::new("Queues")
    }

    /// `QueueStatus`.
    #[must_use]
    pub fn queue_status(action_id: Option<&str>) -> Self {
        with_action_id(Self::new("QueueStatus"), action_id)
    }

    /// `Redirect`: transfer `channel` (and optionally `extra_channel`).
    #[must_use]
    pub fn redirect(
        channel: &str,
        extra_channel: &str,
        exten: &str,
        context: &str,
        priority: &str,
    ) -> Self {
        Self::new("Redirect")
            .param("Channel", channel)
            .param("ExtraChannel", extra_channel)
            .param("Exten", exten)
            .param("Context", context)
            .param("Priority", priority)
    }

    /// `SetCDRUserField`.
    #[must_use]
    pub fn set_cdr_user_field(user_field: &str, channel: &str, append: Option<&str>) -> Self {
        Self::new("SetCDRUserField")
            .param("UserField", user_field)
            .param("Channel", channel)
            .param_opt("Append", present(append))
    }

    /// `SetVar`: set a channel variable.
    #[must_use]
    pub fn set_var(channel: &str, variable: &str, value: &str) -> Self {
        Self::new("SetVar")
            .param("Channel", channel)
            .param("Variable", variable)
            .param("Value", value)
    }

    /// `Status`.
    #[must_use]
    pub fn status(channel: &str, action_id: Option<&str>) -> Self {
        with_action_id(Self::new("Status").param("Channel", channel), action_id)
    }

    /// `StopMonitor`.
    #[must_use]
    pub fn stop_monitor(channel: &str) -> Self {
        Self::new("StopMonitor").param("Channel", channel)
    }

    /// `ZapDialOffhook`.
    #[must_use]
    pub fn zap_dial_offhook(zap_channel: &str, number: impl std::fmt::Display) -> Self {
        Self::new("ZapDialOffhook")
            .param("ZapChannel", zap_channel)
            .param("Number", number)
    }

    /// `ZapDNDoff`.
    #[must_use]
    pub fn zap_dnd_off(zap_channel: &str) -> Self {
        Self::new("ZapDNDoff").param("ZapChannel", zap_channel)
    }

    /// `ZapDNDon`.
    #[must_use]
    pub fn zap_dnd_on(zap_channel: &str) -> Self {
        Self::new("ZapDNDon").param("ZapChannel", zap_channel)
    }

    /// `ZapHangup`.
    #[must_use]
    pub fn zap_hangup(zap_channel: &str) -> Self {
        Self::new("ZapHangup").param("ZapChannel", zap_channel)
    }

    /// `ZapTransfer`.
    #[must_use]
    pub fn zap_transfer(zap_channel: &str) -> Self {
        Self::new("ZapTransfer").param("ZapChannel", zap_channel)
    }

    /// `ZapShowChannels`.
    #[must_use]
    pub fn zap_show_channels(action_id: Option<&str>) -> Self {
        with_action_id(Self::new("ZapShowChannels"), action_id)
    }
}
