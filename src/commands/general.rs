//! General commands - help text.

/// Summary of every console command.
pub const HELP_TEXT: &str = "Allowance Ledger Help\n\
Here is a summary of all available commands.\n\n\
Ledger\n\
• `holden` / `maude` / `select <name>` - Switch ledger (reloads it).\n\
• `income <amount> <description> [@YYYY-MM-DD]` - Records money coming in.\n\
• `expense <amount> <description> [@YYYY-MM-DD]` - Records money going out.\n\
• `delete <id>` - Deletes a transaction from the current ledger.\n\n\
Utility\n\
• `list` / `balance` - Shows the balance and recent transactions.\n\
• `reload` - Loads the current ledger again.\n\
• `help` - Shows this help message.\n\
• `quit` - Leaves.\n\n\
Dates default to today when omitted.";
