//! Keyword tables and canned French responses.
//!
//! The tables are ordered: the resolver walks `GENERAL_RULES` first, then
//! `CATEGORIES`, and the first match wins. Session-ending keywords sit above
//! the closure keywords so "merci, au revoir" still ends the conversation.

/// Outcome of a general (non-troubleshooting) rule.
#[derive(Debug, Clone, Copy)]
pub(super) enum GeneralOutcome {
    Static(&'static str),
    TimeOfDay,
    CurrentDate,
    Identity,
    EndSession,
}

pub(super) struct GeneralRule {
    pub triggers: &'static [&'static str],
    pub outcome: GeneralOutcome,
}

/// One refinement of a troubleshooting category: extra keywords that select
/// a concrete multi-step script.
pub(super) struct RefinementArm {
    pub keywords: &'static [&'static str],
    pub script: &'static str,
}

/// A troubleshooting category: trigger keywords, its refinement arms in
/// priority order, and the clarifying question asked when only the category
/// keyword was heard.
pub(super) struct Category {
    pub triggers: &'static [&'static str],
    pub arms: &'static [RefinementArm],
    pub clarify: &'static str,
    /// Application-name substitutions applied to the selected script at
    /// every `{app}` insertion point, first hit wins.
    pub app_names: Option<&'static [(&'static str, &'static str)]>,
}

pub(super) const APP_PLACEHOLDER: &str = "{app}";
pub(super) const DEFAULT_APP_NAME: &str = "une application Office";

pub(crate) const EMPTY_INPUT: &str =
    "Je n'ai rien entendu. Veuillez répéter votre problème.";

const GREETING_REPLY: &str = "Bonjour ! Décrivez-moi votre problème technique.";

const ACKNOWLEDGEMENT: &str = "Parfait ! N'hésitez pas si vous avez un autre problème.";

pub(super) const GENERAL_RULES: &[GeneralRule] = &[
    GeneralRule {
        triggers: &["bonjour", "salut"],
        outcome: GeneralOutcome::Static(GREETING_REPLY),
    },
    GeneralRule {
        triggers: &["quelle heure", "l'heure"],
        outcome: GeneralOutcome::TimeOfDay,
    },
    GeneralRule {
        triggers: &["quelle date", "la date"],
        outcome: GeneralOutcome::CurrentDate,
    },
    GeneralRule {
        triggers: &["qui es tu", "comment tu t'appelles"],
        outcome: GeneralOutcome::Identity,
    },
    GeneralRule {
        triggers: &["arrête", "au revoir", "quitter", "stop"],
        outcome: GeneralOutcome::EndSession,
    },
    GeneralRule {
        triggers: &["merci", "c'est bon", "résolu", "ça marche"],
        outcome: GeneralOutcome::Static(ACKNOWLEDGEMENT),
    },
];

const PRINTER_SCRIPT: &str = "Problème d'imprimante détecté. Voici quelques étapes :\n\
1. Vérifiez que l'imprimante est allumée et bien branchée (USB et alimentation).\n\
2. Assurez-vous qu'il y a du papier et de l'encre ou du toner.\n\
3. Essayez de redémarrer l'imprimante et votre ordinateur.\n\
4. Ouvrez la file d'attente d'impression sur votre PC et annulez les travaux bloqués.\n\
5. Essayez d'imprimer une page de test depuis les paramètres Windows de l'imprimante.";

const NETWORK_DOWN_SCRIPT: &str = "Problème de connexion internet. Essayons ceci :\n\
1. Vérifiez si d'autres appareils (téléphone, autre PC) ont accès à internet. Cela permet de savoir si le problème vient de votre PC ou du réseau.\n\
2. Redémarrez votre modem et votre routeur. Débranchez-les pendant 30 secondes, puis rebranchez d'abord le modem, attendez qu'il soit stable, puis le routeur.\n\
3. Redémarrez votre ordinateur.\n\
4. Si vous êtes en Wifi, vérifiez que vous êtes connecté au bon réseau et que le signal est suffisant.\n\
5. Si vous êtes par câble, vérifiez que le câble est bien branché des deux côtés.\n\
Si le problème persiste après ces étapes, contactez votre fournisseur d'accès.";

const NETWORK_SLOW_SCRIPT: &str = "Connexion internet lente ? Voici quelques pistes :\n\
1. Redémarrez votre modem, routeur et ordinateur.\n\
2. Rapprochez-vous de votre routeur Wifi si possible.\n\
3. Vérifiez si des téléchargements lourds ou des mises à jour sont en cours sur votre PC ou d'autres appareils.\n\
4. Trop d'appareils connectés en même temps peuvent ralentir la connexion.";

const COMPUTER_SCRIPT: &str = "Ordinateur lent ou bloqué ? Essayons ces actions :\n\
1. La première chose à faire : redémarrez complètement l'ordinateur.\n\
2. Fermez toutes les applications que vous n'utilisez pas activement.\n\
3. Vérifiez si votre disque dur n'est pas presque plein.\n\
4. Assurez-vous que Windows et vos pilotes sont à jour.\n\
5. Vous pouvez ouvrir le Gestionnaire des tâches (Ctrl + Maj + Echap) pour voir si un programme utilise anormalement beaucoup de ressources, mais je ne peux pas le faire pour vous.\n\
6. Pensez à faire une analyse antivirus et anti-malware.";

const OFFICE_SCRIPT: &str = "Problème avec {app}. Voici des suggestions :\n\
1. Essayez de fermer complètement {app} (via le Gestionnaire des tâches si nécessaire) et de le rouvrir.\n\
2. Redémarrez votre ordinateur.\n\
3. Le problème se produit-il avec un seul fichier ou tous les fichiers de ce type ? Si c'est un seul fichier, il est peut-être corrompu.\n\
4. Essayez de lancer {app} en mode sans échec. Pour cela, cherchez '{app} /safe' dans la barre de recherche Windows.\n\
5. Vous pouvez tenter de réparer l'installation d'Office depuis le Panneau de configuration, sous 'Programmes et fonctionnalités'.";

const LAPTOP_CHARGE_SCRIPT: &str = "Problème de charge de la batterie du portable ?\n\
1. Vérifiez que le chargeur est bien branché à la prise murale et au portable.\n\
2. Essayez une autre prise murale si possible.\n\
3. Vérifiez l'état du câble et du connecteur du chargeur (pas de dommage visible).\n\
4. Redémarrez l'ordinateur portable.\n\
5. Si possible, retirez la batterie (si elle est amovible), nettoyez les contacts, et remettez-la.";

const LAPTOP_DRAIN_SCRIPT: &str = "La batterie de votre portable se décharge vite ?\n\
1. Réduisez la luminosité de l'écran.\n\
2. Fermez les programmes gourmands en ressources que vous n'utilisez pas.\n\
3. Déconnectez les périphériques USB non nécessaires.\n\
4. Vérifiez les paramètres d'alimentation de Windows pour optimiser l'autonomie.\n\
Il est normal que les batteries perdent de leur capacité avec le temps.";

const PASSWORD_FORGOT_SCRIPT: &str = "Mot de passe oublié ? Malheureusement, je ne peux pas le récupérer pour vous. \n\
Utilisez l'option 'Mot de passe oublié' ou 'Réinitialiser le mot de passe' sur le site web ou l'application concernée. \n\
Vérifiez aussi que la touche Verr Maj (Caps Lock) n'est pas activée.";

const ACCOUNT_LOCKED_SCRIPT: &str = "Compte bloqué ? Cela arrive souvent après trop de tentatives de connexion échouées.\n\
Attendez un peu (parfois 30 minutes ou une heure) avant de réessayer.\n\
Sinon, utilisez l'option 'Mot de passe oublié' ou contactez le support du service concerné.";

pub(super) const CATEGORIES: &[Category] = &[
    Category {
        triggers: &["imprimante", "imprime pas", "impression"],
        arms: &[RefinementArm {
            keywords: &["bloqué", "erreur", "marche pas", "fonctionne pas"],
            script: PRINTER_SCRIPT,
        }],
        clarify: "Vous avez un souci avec l'impression ? Pourriez-vous préciser ? Par exemple, l'imprimante ne répond pas, ou il y a une erreur ?",
        app_names: None,
    },
    Category {
        triggers: &["internet", "wifi", "wi-fi", "connexion", "réseau"],
        arms: &[
            RefinementArm {
                keywords: &["marche pas", "fonctionne pas", "pas de connexion", "aucun accès"],
                script: NETWORK_DOWN_SCRIPT,
            },
            RefinementArm {
                keywords: &["lent", "lente"],
                script: NETWORK_SLOW_SCRIPT,
            },
        ],
        clarify: "Vous avez un problème de réseau ou d'internet ? Est-ce une absence de connexion, ou une lenteur ?",
        app_names: None,
    },
    Category {
        triggers: &["ordinateur", "pc", "système"],
        arms: &[RefinementArm {
            keywords: &["lent", "rame", "bloqué", "figé"],
            script: COMPUTER_SCRIPT,
        }],
        clarify: "Votre ordinateur pose problème ? Est-il lent, ou complètement bloqué ?",
        app_names: None,
    },
    Category {
        triggers: &["word", "excel", "outlook", "powerpoint", "office"],
        arms: &[RefinementArm {
            keywords: &["ouvre pas", "ne répond pas", "bloqué", "erreur"],
            script: OFFICE_SCRIPT,
        }],
        clarify: "Vous rencontrez un souci avec une application Office ? Laquelle et que se passe-t-il exactement ?",
        app_names: Some(&[
            ("word", "Word"),
            ("excel", "Excel"),
            ("outlook", "Outlook"),
            ("powerpoint", "PowerPoint"),
        ]),
    },
    Category {
        triggers: &["portable", "batterie"],
        arms: &[
            RefinementArm {
                keywords: &["charge pas"],
                script: LAPTOP_CHARGE_SCRIPT,
            },
            RefinementArm {
                keywords: &["tient pas", "vide vite"],
                script: LAPTOP_DRAIN_SCRIPT,
            },
        ],
        clarify: "Un souci avec votre portable ? La batterie ne charge plus, ou se décharge trop vite ?",
        app_names: None,
    },
    Category {
        triggers: &["mot de passe", "compte"],
        arms: &[
            RefinementArm {
                keywords: &["oublié"],
                script: PASSWORD_FORGOT_SCRIPT,
            },
            RefinementArm {
                keywords: &["bloqué"],
                script: ACCOUNT_LOCKED_SCRIPT,
            },
        ],
        clarify: "Un problème de mot de passe ou de compte ? Est-il oublié, ou le compte est-il bloqué ?",
        app_names: None,
    },
];

pub(super) const WEEKDAYS: [&str; 7] = [
    "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
];

pub(super) const MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];
